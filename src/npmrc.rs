//! Copies `.npmrc` next to a package manager invocation, commenting out lines that
//! reference unset environment variables.
//!
//! npm expands `${VAR}` in `.npmrc` to an empty string when the variable is not set,
//! which leaves a valid-looking registry mapping with an empty token. Commenting such
//! lines out lets npm fall through to other sources such as the user's home `.npmrc`.

use std::path::Path;
use std::sync::LazyLock;
use regex::Regex;
use tracing::{debug, warn};
use crate::error::{InstallRunError, Result};
use crate::util::LINE_ENDING;

pub const NPMRC_FILENAME: &str = ".npmrc";
/// Prefix written in front of a line that references a missing variable.
pub const MISSING_VARIABLE_PREFIX: &str = "; MISSING ENVIRONMENT VARIABLE: ";

static VARIABLE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("variable token pattern is valid"));

/// Mirrors `<source_folder>/.npmrc` into `<target_folder>/.npmrc`.
///
/// If the source file is absent, a stale target file is deleted.
///
/// # Errors
/// Returns [`InstallRunError::ConfigSync`] on any I/O failure.
pub fn sync_npmrc<P: AsRef<Path>, Q: AsRef<Path>>(source_folder: P, target_folder: Q) -> Result<()> {
    sync_npmrc_with(source_folder, target_folder, env_lookup)
}

/// Reads an environment variable; values that aren't valid UTF-8 still count as set.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
}

/// Like [`sync_npmrc`], reading variables through `lookup`.
pub fn sync_npmrc_with<P, Q, F>(source_folder: P, target_folder: Q, lookup: F) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: Fn(&str) -> Option<String>,
{
    let source_path = source_folder.as_ref().join(NPMRC_FILENAME);
    let target_path = target_folder.as_ref().join(NPMRC_FILENAME);
    let sync_error = |source: std::io::Error| InstallRunError::ConfigSync {
        source_path: source_path.clone(),
        target_path: target_path.clone(),
        source,
    };

    if source_path.exists() {
        let content = std::fs::read_to_string(&source_path).map_err(sync_error)?;
        let lines = trim_npmrc_lines(&content, lookup);
        std::fs::write(&target_path, lines.join(LINE_ENDING)).map_err(sync_error)?;
        debug!(source = %source_path.display(), target = %target_path.display(), "synced .npmrc");
    } else if target_path.exists() {
        std::fs::remove_file(&target_path).map_err(sync_error)?;
        debug!(target = %target_path.display(), "removed stale .npmrc");
    }
    Ok(())
}

/// Trims every line of `content` and comments out lines with a `${VAR}` token whose
/// variable is unset or empty.
pub fn trim_npmrc_lines<F>(content: &str, lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    content
        .split('\n')
        .map(str::trim)
        .map(|line| {
            let missing = VARIABLE_TOKEN
                .captures_iter(line)
                .map(|captures| captures[1].to_string())
                .find(|name| lookup(name).is_none_or(|value| value.is_empty()));
            match missing {
                Some(name) => {
                    warn!(variable = %name, "commenting out .npmrc line with an unset variable");
                    format!("{MISSING_VARIABLE_PREFIX}{line}")
                }
                None => line.to_string(),
            }
        })
        .collect()
}
