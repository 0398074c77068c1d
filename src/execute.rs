use anyhow::{Context as _, Result};
use colored::Colorize;
use install_run::{
    Context, PackageSpecifier, install_and_run, resolve_package_version, run_with_error_and_status_code,
};
use crate::cli::{CLI, EXAMPLE, USAGE};

/// Runs the command line and returns the process exit code.
pub fn execute(cli: CLI) -> i32 {
    let (Some(package), Some((bin_name, bin_args))) = (cli.package.as_deref(), cli.bin_and_args()) else {
        println!("{USAGE}");
        println!("{EXAMPLE}");
        return 1;
    };
    run_with_error_and_status_code(|| execute_install_and_run(&cli, package, bin_name, bin_args))
}

fn execute_install_and_run(cli: &CLI, package: &str, bin_name: &str, bin_args: &[String]) -> Result<i32> {
    let ctx = Context::from_current_dir(cli.overrides())?;
    let common_folder = ctx.common_folder()?;

    let specifier = PackageSpecifier::parse(package)?;
    let version = resolve_package_version(&ctx, &common_folder, &specifier)?;
    if specifier.version.as_deref() != Some(version.as_str()) {
        println!("{}", format!("Resolved to {}@{}", specifier.name, version).yellow());
    }

    install_and_run(&ctx, &specifier.name, &version, bin_name, bin_args)
        .with_context(|| format!("Failed to run {bin_name} from {}@{}", specifier.name, version))
}
