use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(target_os = "windows")]
pub const LINE_ENDING: &str = "\r\n";

#[cfg(not(target_os = "windows"))]
pub const LINE_ENDING: &str = "\n";

/// Suffix of the launchers npm writes into `node_modules/.bin`.
#[cfg(windows)]
pub const BIN_SUFFIX: &str = ".cmd";
#[cfg(not(windows))]
pub const BIN_SUFFIX: &str = "";

pub const NODE_MODULES_FOLDER_NAME: &str = "node_modules";

/// Returns the path of `bin_name`'s launcher inside a package install folder:
/// `<folder>/node_modules/.bin/<bin_name>` (with `.cmd` appended on Windows).
pub fn get_bin_path<P: AsRef<Path>>(package_install_folder: P, bin_name: &str) -> PathBuf {
    package_install_folder
        .as_ref()
        .join(NODE_MODULES_FOLDER_NAME)
        .join(".bin")
        .join(format!("{bin_name}{BIN_SUFFIX}"))
}

/// Milliseconds since the Unix epoch, `0` if the clock is before it.
pub fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0)
}

/// Formats the `Invoking "<bin> <args>"` notice followed by an underline of dashes.
pub fn status_banner(bin_name: &str, bin_args: &[String]) -> (String, String) {
    let message = format!("Invoking \"{} {}\"", bin_name, bin_args.join(" "));
    let underline = "-".repeat(message.chars().count());
    (message, underline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_bin_path() {
        let path = get_bin_path("/repo/common/temp/install-run/rimraf@2.6.2", "rimraf");
        #[cfg(windows)]
        assert!(path.ends_with("node_modules/.bin/rimraf.cmd"));
        #[cfg(not(windows))]
        assert_eq!(path, PathBuf::from("/repo/common/temp/install-run/rimraf@2.6.2/node_modules/.bin/rimraf"));
    }

    #[test]
    fn test_status_banner_underline_matches_length() {
        let (message, underline) = status_banner("rimraf", &["-f".to_string(), "out/".to_string()]);
        assert_eq!(message, "Invoking \"rimraf -f out/\"");
        assert_eq!(underline.len(), message.len());
        assert!(underline.chars().all(|c| c == '-'));
    }

    #[test]
    fn test_epoch_millis_is_increasing() {
        let first = epoch_millis();
        let second = epoch_millis();
        assert!(first > 0);
        assert!(second >= first);
    }
}
