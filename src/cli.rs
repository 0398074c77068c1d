use std::path::PathBuf;
use clap::Parser;
use install_run::Settings;

pub const USAGE: &str = "Usage: install-run <package>@<version> <command> [args...]";
pub const EXAMPLE: &str = "Example: install-run rimraf@2.6.2 rimraf -f project1/lib";

#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CLI {
    /// Package to install: <name>@<version>, e.g. `rimraf@2.6.2` or `typescript@~3.1`
    pub package: Option<String>,
    /// Binary from the package's `node_modules/.bin` to run, followed by the arguments
    /// forwarded to it verbatim
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
    /// Package manager executable to use instead of the `npm` found on the host
    #[arg(long, env = "INSTALL_RUN_PACKAGE_MANAGER")]
    pub package_manager: Option<PathBuf>,
    /// Identity recorded in `installed.flag` instead of the host's `node --version`
    #[arg(long, env = "INSTALL_RUN_RUNTIME_IDENTITY")]
    pub runtime_identity: Option<String>,
    /// Don't take the per-package install lock
    #[arg(long, env = "INSTALL_RUN_NO_LOCK")]
    pub no_lock: bool,
}

impl CLI {
    /// Splits the trailing command into the binary name and its arguments.
    pub fn bin_and_args(&self) -> Option<(&str, &[String])> {
        self.command
            .split_first()
            .map(|(bin_name, bin_args)| (bin_name.as_str(), bin_args))
    }

    /// Settings given on the command line; they take precedence over `install-run.toml`.
    pub fn overrides(&self) -> Settings {
        Settings {
            package_manager: self.package_manager.clone(),
            runtime_identity: self.runtime_identity.clone(),
            lock: self.no_lock.then_some(false),
        }
    }
}
