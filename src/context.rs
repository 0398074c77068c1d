use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use tracing::debug;
use crate::config::{CONFIG_FILENAME, Settings};
use crate::error::{InstallRunError, Result};
use crate::paths::{COMMON_FOLDER_NAME, ensure_and_join_path, find_project_root, rush_config_folder};
use crate::process::{ProcessRunner, SystemRunner, locate_tool, query_runtime_identity};

const PACKAGE_MANAGER_TOOL: &str = "npm";
const RUNTIME_TOOL: &str = "node";

/// State shared by every step of one invocation.
///
/// Host lookups (project root, settings, package manager path, runtime identity)
/// are computed on first use and then stay fixed for the lifetime of the context.
pub struct Context<R: ProcessRunner = SystemRunner> {
    runner: R,
    working_dir: PathBuf,
    overrides: Settings,
    project_root: OnceCell<PathBuf>,
    settings: OnceCell<Settings>,
    package_manager: OnceCell<PathBuf>,
    runtime_identity: OnceCell<String>,
}

impl Context<SystemRunner> {
    /// Context for the current process: real child processes, rooted at the current directory.
    pub fn from_current_dir(overrides: Settings) -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| InstallRunError::io("reading the current working directory", e))?;
        Ok(Context::new(SystemRunner, cwd, overrides))
    }
}

impl<R: ProcessRunner> Context<R> {
    /// `working_dir` is both where the project root search starts and where the
    /// invoked binary runs.
    pub fn new<P: Into<PathBuf>>(runner: R, working_dir: P, overrides: Settings) -> Self {
        Self {
            runner,
            working_dir: working_dir.into(),
            overrides,
            project_root: OnceCell::new(),
            settings: OnceCell::new(),
            package_manager: OnceCell::new(),
            runtime_identity: OnceCell::new(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// The nearest ancestor of the working directory containing `rush.json`.
    pub fn project_root(&self) -> Result<&Path> {
        memoize(&self.project_root, || find_project_root(&self.working_dir)).map(PathBuf::as_path)
    }

    /// `<projectRoot>/common`, created if missing.
    pub fn common_folder(&self) -> Result<PathBuf> {
        ensure_and_join_path(self.project_root()?, &[COMMON_FOLDER_NAME])
    }

    /// Command-line overrides layered over `common/config/rush/install-run.toml`.
    pub fn settings(&self) -> Result<&Settings> {
        memoize(&self.settings, || {
            let path = rush_config_folder(self.common_folder()?).join(CONFIG_FILENAME);
            let file = Settings::load_or_default(&path)?;
            Ok(self.overrides.clone().overlay(file))
        })
    }

    /// Absolute path of the package manager executable.
    pub fn package_manager(&self) -> Result<&Path> {
        memoize(&self.package_manager, || match &self.settings()?.package_manager {
            Some(path) => Ok(path.clone()),
            None => locate_tool(&self.runner, PACKAGE_MANAGER_TOOL, &self.working_dir),
        })
        .map(PathBuf::as_path)
    }

    /// Identity string stored in `installed.flag` (the host runtime's version).
    pub fn runtime_identity(&self) -> Result<&str> {
        memoize(&self.runtime_identity, || match &self.settings()?.runtime_identity {
            Some(identity) => Ok(identity.trim().to_string()),
            None => {
                let node = locate_tool(&self.runner, RUNTIME_TOOL, &self.working_dir)?;
                query_runtime_identity(&self.runner, &node, &self.working_dir)
            }
        })
        .map(String::as_str)
    }
}

fn memoize<T>(cell: &OnceCell<T>, init: impl FnOnce() -> Result<T>) -> Result<&T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = init()?;
    debug!("memoized host lookup");
    Ok(cell.get_or_init(|| value))
}
