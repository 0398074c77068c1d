use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use colored::Colorize;
use serde::Serialize;
use tracing::{debug, info};
use crate::context::Context;
use crate::error::{InstallRunError, Result};
use crate::lock::InstallLock;
use crate::npmrc::sync_npmrc;
use crate::paths::{ensure_and_join_path, rush_config_folder};
use crate::process::{Invocation, ProcessRunner, StdioMode};
use crate::util::{NODE_MODULES_FOLDER_NAME, epoch_millis};

/// Completion marker; holds the runtime identity of the install that wrote it.
pub const INSTALLED_FLAG_FILENAME: &str = "installed.flag";
pub const PACKAGE_JSON_FILENAME: &str = "package.json";
pub const PACKAGE_LOCK_FILENAME: &str = "package-lock.json";

/// What [`ensure_installed`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    AlreadyInstalled,
    Installed,
}

/// The throwaway manifest declaring the single package to install.
#[derive(Serialize, Debug)]
pub struct PackageJson {
    pub name: String,
    pub version: String,
    pub dependencies: BTreeMap<String, String>,
    pub description: String,
    pub repository: String,
    pub license: String,
}

impl PackageJson {
    pub fn for_dependency(name: &str, version: &str) -> PackageJson {
        PackageJson {
            name: "ci-rush".to_string(),
            version: "0.0.0".to_string(),
            dependencies: BTreeMap::from([(name.to_string(), version.to_string())]),
            description: "DON'T WARN".to_string(),
            repository: "DON'T WARN".to_string(),
            license: "MIT".to_string(),
        }
    }
}

/// Folder holding one `name@version` install: `<common>/temp/install-run/<name>@<version>`.
pub fn package_install_folder(common_folder: &Path, name: &str, version: &str) -> Result<PathBuf> {
    ensure_and_join_path(common_folder, &["temp", "install-run", &format!("{name}@{version}")])
}

/// Returns `true` if `installed.flag` exists and holds exactly `runtime_identity`.
/// Read failures count as not installed.
pub fn is_package_already_installed<P: AsRef<Path>>(package_install_folder: P, runtime_identity: &str) -> bool {
    let flag = package_install_folder.as_ref().join(INSTALLED_FLAG_FILENAME);
    match std::fs::read_to_string(&flag) {
        Ok(contents) => {
            let installed = contents.trim() == runtime_identity;
            if !installed {
                debug!(flag = %flag.display(), found = contents.trim(), expected = runtime_identity, "runtime changed since install");
            }
            installed
        }
        Err(_) => false,
    }
}

/// Resets a package install folder: removes the marker and lockfile, and moves
/// `node_modules` into `<common>/temp/rush-recycler/install-run-<epoch-ms>`.
///
/// Returns the recycler folder if a dependency tree was moved.
pub fn clean_install_folder<P: AsRef<Path>, Q: AsRef<Path>>(
    common_folder: P,
    package_install_folder: Q,
) -> Result<Option<PathBuf>> {
    let folder = package_install_folder.as_ref();
    let clean_error = |source: std::io::Error| InstallRunError::CleanFolder {
        path: folder.to_path_buf(),
        source,
    };

    for file_name in [INSTALLED_FLAG_FILENAME, PACKAGE_LOCK_FILENAME] {
        let path = folder.join(file_name);
        if path.exists() {
            std::fs::remove_file(&path).map_err(clean_error)?;
        }
    }

    let node_modules = folder.join(NODE_MODULES_FOLDER_NAME);
    if !node_modules.exists() {
        return Ok(None);
    }
    let recycler = ensure_and_join_path(common_folder, &["temp", "rush-recycler"])?;
    let stamp = epoch_millis();
    let mut target = recycler.join(format!("install-run-{stamp}"));
    let mut attempt = 1;
    while target.exists() {
        target = recycler.join(format!("install-run-{stamp}-{attempt}"));
        attempt += 1;
    }
    std::fs::rename(&node_modules, &target).map_err(clean_error)?;
    debug!(from = %node_modules.display(), to = %target.display(), "recycled dependency tree");
    Ok(Some(target))
}

/// Writes `package.json` declaring exactly one dependency, `name: version`.
pub fn create_package_json<P: AsRef<Path>>(package_install_folder: P, name: &str, version: &str) -> Result<()> {
    let folder = package_install_folder.as_ref();
    let manifest_error = |source: std::io::Error| InstallRunError::Manifest {
        path: folder.to_path_buf(),
        source,
    };
    let content = serde_json::to_string_pretty(&PackageJson::for_dependency(name, version))
        .map_err(|e| manifest_error(e.into()))?;
    std::fs::write(folder.join(PACKAGE_JSON_FILENAME), content).map_err(manifest_error)
}

/// Runs `npm install` in the package install folder with inherited stdio.
pub fn install_package<R: ProcessRunner>(
    ctx: &Context<R>,
    package_install_folder: &Path,
    name: &str,
    version: &str,
) -> Result<()> {
    let install_error = |reason: String| InstallRunError::Install {
        name: name.to_string(),
        version: version.to_string(),
        reason,
    };
    println!("{}", format!("Installing {name}...").bold());
    let npm = ctx.package_manager().map_err(|e| install_error(e.to_string()))?;
    let invocation = Invocation::new(npm, package_install_folder, StdioMode::Inherited).args(["install"]);
    let completion = ctx
        .runner()
        .run(&invocation)
        .map_err(|e| install_error(e.to_string()))?;
    if !completion.success() {
        return Err(install_error(format!(
            "\"npm install\" encountered an error (exit code {})",
            completion.status_display()
        )));
    }
    println!("{}", format!("Successfully installed {name}@{version}").green());
    Ok(())
}

/// Writes the completion marker.
pub fn write_flag_file<P: AsRef<Path>>(package_install_folder: P, runtime_identity: &str) -> Result<()> {
    let folder = package_install_folder.as_ref();
    std::fs::write(folder.join(INSTALLED_FLAG_FILENAME), runtime_identity).map_err(|source| {
        InstallRunError::Marker {
            path: folder.to_path_buf(),
            source,
        }
    })
}

/// Makes sure `name@version` is installed in `package_install_folder`.
///
/// If the marker matches the current runtime this does nothing. Otherwise it takes the
/// install lock (unless disabled), checks again, then cleans the folder, syncs `.npmrc`,
/// writes `package.json`, runs `npm install` and writes the marker, in that order.
/// A failure leaves no marker, so the next run starts over.
pub fn ensure_installed<R: ProcessRunner>(
    ctx: &Context<R>,
    package_install_folder: &Path,
    name: &str,
    version: &str,
) -> Result<InstallOutcome> {
    let runtime_identity = ctx.runtime_identity()?;
    if is_package_already_installed(package_install_folder, runtime_identity) {
        debug!(name, version, "already installed");
        return Ok(InstallOutcome::AlreadyInstalled);
    }

    let _lock = if ctx.settings()?.lock_enabled() {
        Some(InstallLock::acquire(package_install_folder)?)
    } else {
        None
    };
    if is_package_already_installed(package_install_folder, runtime_identity) {
        info!(name, version, "installed by a concurrent run");
        return Ok(InstallOutcome::AlreadyInstalled);
    }

    let common_folder = ctx.common_folder()?;
    clean_install_folder(&common_folder, package_install_folder)?;
    sync_npmrc(rush_config_folder(&common_folder), package_install_folder)?;
    create_package_json(package_install_folder, name, version)?;
    install_package(ctx, package_install_folder, name, version)?;
    write_flag_file(package_install_folder, runtime_identity)?;
    info!(name, version, folder = %package_install_folder.display(), "install complete");
    Ok(InstallOutcome::Installed)
}
