use std::path::{Path, PathBuf};
use tracing::debug;
use crate::error::{InstallRunError, Result};

/// Sentinel file marking the project root.
pub const RUSH_JSON_FILENAME: &str = "rush.json";
/// Folder under the project root holding shared configuration and temp state.
pub const COMMON_FOLDER_NAME: &str = "common";

/// Walks from `start` towards the filesystem root and returns the first folder
/// (inclusive) that contains `rush.json`.
///
/// # Errors
/// Returns [`InstallRunError::ProjectRootNotFound`] if no ancestor contains the sentinel.
pub fn find_project_root<P: AsRef<Path>>(start: P) -> Result<PathBuf> {
    let start = start.as_ref();
    for folder in start.ancestors() {
        if folder.join(RUSH_JSON_FILENAME).exists() {
            debug!(root = %folder.display(), "found project root");
            return Ok(folder.to_path_buf());
        }
    }
    Err(InstallRunError::ProjectRootNotFound {
        sentinel: RUSH_JSON_FILENAME.to_string(),
        start: start.to_path_buf(),
    })
}

/// Joins `segments` onto `base`, creating each missing folder along the way.
///
/// Path separators inside a segment are replaced with `+` so a segment such as
/// `@scope/pkg@1.0.0` stays a single folder. Empty, `.` and `..` segments are
/// rejected. `base` is assumed to exist.
pub fn ensure_and_join_path<P: AsRef<Path>>(base: P, segments: &[&str]) -> Result<PathBuf> {
    let base = base.as_ref();
    let mut sanitized = Vec::with_capacity(segments.len());
    for segment in segments {
        let segment = sanitize_segment(segment);
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(InstallRunError::InvalidSegment {
                path: attempted_path(base, segments),
                segment,
            });
        }
        sanitized.push(segment);
    }

    let mut joined = base.to_path_buf();
    for segment in &sanitized {
        joined.push(segment);
        if !joined.exists() {
            match std::fs::create_dir(&joined) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
                Err(e) => {
                    return Err(InstallRunError::JoinPath {
                        path: attempted_path(base, segments),
                        source: e,
                    });
                }
            }
        }
    }
    Ok(joined)
}

fn sanitize_segment(segment: &str) -> String {
    segment.replace(['/', '\\'], "+")
}

fn attempted_path(base: &Path, segments: &[&str]) -> PathBuf {
    segments.iter().fold(base.to_path_buf(), |path, segment| path.join(segment))
}

/// `<projectRoot>/common/config/rush`, where the source `.npmrc` lives.
pub fn rush_config_folder<P: AsRef<Path>>(common_folder: P) -> PathBuf {
    common_folder.as_ref().join("config").join("rush")
}
