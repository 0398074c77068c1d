use std::fmt::Display;
use colored::Colorize;
use tracing::debug;
use crate::context::Context;
use crate::error::{InstallRunError, Result};
use crate::installer::{ensure_installed, package_install_folder};
use crate::process::{Invocation, ProcessRunner, StdioMode};
use crate::util::{LINE_ENDING, get_bin_path, status_banner};

/// Exit code used whenever a run fails before the invoked binary reports its own.
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Installs `name@version` into the project's install-run cache if needed, then runs
/// `bin_name` from its `node_modules/.bin` with `bin_args`.
///
/// The binary inherits stdio and environment and runs in the caller's working
/// directory, not in the cache. Its exit code is returned unchanged.
///
/// # Errors
/// Fails if the project root can't be found, the install fails, the binary doesn't
/// exist after installing, or the binary exits without an exit code.
pub fn install_and_run<R: ProcessRunner>(
    ctx: &Context<R>,
    name: &str,
    version: &str,
    bin_name: &str,
    bin_args: &[String],
) -> Result<i32> {
    let common_folder = ctx.common_folder()?;
    let folder = package_install_folder(&common_folder, name, version)?;
    let outcome = ensure_installed(ctx, &folder, name, version)?;
    debug!(?outcome, folder = %folder.display(), "package ready");

    let (message, underline) = status_banner(bin_name, bin_args);
    println!("{LINE_ENDING}{}{LINE_ENDING}{}{LINE_ENDING}", message.cyan(), underline);

    let bin_path = get_bin_path(&folder, bin_name);
    if !bin_path.is_file() {
        return Err(InstallRunError::BinaryNotFound {
            bin: bin_name.to_string(),
            path: bin_path,
        });
    }
    let invocation = Invocation::new(&bin_path, ctx.working_dir(), StdioMode::Inherited)
        .args(bin_args.iter().cloned());
    let completion = ctx.runner().run(&invocation).map_err(|source| InstallRunError::Spawn {
        path: bin_path.clone(),
        source,
    })?;
    completion.status.ok_or_else(|| InstallRunError::NoExitStatus {
        bin: bin_name.to_string(),
    })
}

/// Runs `f` and turns its outcome into a process exit code.
///
/// The code starts out as [`FAILURE_EXIT_CODE`] and is only replaced by the value `f`
/// returns; an error is printed to stderr and keeps the failing code.
pub fn run_with_error_and_status_code<F, E>(f: F) -> i32
where
    F: FnOnce() -> std::result::Result<i32, E>,
    E: Display,
{
    let mut exit_code = FAILURE_EXIT_CODE;
    match f() {
        Ok(code) => exit_code = code,
        Err(e) => {
            eprintln!("{LINE_ENDING}{LINE_ENDING}{} {e:#}{LINE_ENDING}{LINE_ENDING}", "Error:".red().bold());
        }
    }
    exit_code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_with_error_keeps_failing_code() {
        let code = run_with_error_and_status_code(|| Err::<i32, _>("npm install failed"));
        assert_eq!(code, FAILURE_EXIT_CODE);
    }

    #[test]
    fn test_run_with_error_forwards_code() {
        assert_eq!(run_with_error_and_status_code(|| Ok::<_, String>(0)), 0);
        assert_eq!(run_with_error_and_status_code(|| Ok::<_, String>(42)), 42);
    }
}
