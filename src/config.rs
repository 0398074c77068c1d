use std::path::{Path, PathBuf};
use serde::Deserialize;
use crate::error::{InstallRunError, Result};

/// File name of the optional settings file, looked up in `common/config/rush/`.
pub const CONFIG_FILENAME: &str = "install-run.toml";

/// Settings for one run.
///
/// Every field is optional so that layers can be stacked with [`Settings::overlay`]:
/// command-line values over `install-run.toml` over built-in defaults.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Path to the package manager executable. When unset, `npm` is located on the host.
    pub package_manager: Option<PathBuf>,
    /// Identity written to `installed.flag`. When unset, the host runtime is asked for its version.
    pub runtime_identity: Option<String>,
    /// Whether installs take the per-package advisory lock. Defaults to `true`.
    pub lock: Option<bool>,
}

impl Settings {
    /// Loads settings from `path`, or returns the defaults if the file does not exist.
    ///
    /// # Errors
    /// Returns [`InstallRunError::ConfigInvalid`] if the file can't be read or parsed.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Settings> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Settings::default());
        }
        let invalid = |reason: String| InstallRunError::ConfigInvalid {
            path: path.to_path_buf(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        toml::from_str(&content).map_err(|e| invalid(e.to_string()))
    }

    /// Returns `self` with every unset field taken from `lower`.
    pub fn overlay(self, lower: Settings) -> Settings {
        Settings {
            package_manager: self.package_manager.or(lower.package_manager),
            runtime_identity: self.runtime_identity.or(lower.runtime_identity),
            lock: self.lock.or(lower.lock),
        }
    }

    pub fn lock_enabled(&self) -> bool {
        self.lock.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = Settings::load_or_default(dir.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.lock_enabled());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "package_manager = \"/usr/local/bin/npm\"\nlock = false\n").unwrap();
        let loaded = Settings::load_or_default(&path).unwrap();
        assert_eq!(
            loaded,
            Settings {
                package_manager: Some(PathBuf::from("/usr/local/bin/npm")),
                runtime_identity: None,
                lock: Some(false),
            }
        );
        assert!(!loaded.lock_enabled());
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "registry = \"https://example.com/\"\n").unwrap();
        assert!(Settings::load_or_default(&path).is_err());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "lock = \"sometimes\"\n").unwrap();
        let err = Settings::load_or_default(&path).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILENAME));
    }

    #[test]
    fn test_overlay_prefers_upper_layer() {
        let upper = Settings {
            package_manager: None,
            runtime_identity: Some("v20.0.0".to_string()),
            lock: None,
        };
        let lower = Settings {
            package_manager: Some(PathBuf::from("npm")),
            runtime_identity: Some("v18.0.0".to_string()),
            lock: Some(false),
        };
        let merged = upper.overlay(lower);
        assert_eq!(merged.package_manager, Some(PathBuf::from("npm")));
        assert_eq!(merged.runtime_identity.as_deref(), Some("v20.0.0"));
        assert_eq!(merged.lock, Some(false));
    }
}
