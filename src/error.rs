use std::path::PathBuf;
use thiserror::Error;

/// Result type alias used across the library.
pub type Result<T> = std::result::Result<T, InstallRunError>;

/// Coarse classification of [`InstallRunError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Resolution,
    Path,
    ConfigSync,
    Install,
    Exec,
    Config,
    Io,
}

/// All errors that can occur while resolving, installing or invoking a package.
#[derive(Debug, Error)]
pub enum InstallRunError {
    // Parsing
    #[error("Invalid package specifier: {0:?}")]
    InvalidSpecifier(String),

    // Resolution
    #[error("Unable to resolve version {version} of package {name}: {reason}")]
    Resolution {
        name: String,
        version: String,
        reason: String,
    },

    // Paths
    #[error("Unable to find {sentinel} in {start} or any of its parent folders")]
    ProjectRootNotFound { sentinel: String, start: PathBuf },

    #[error("Error building local installation folder ({path}): {source}")]
    JoinPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error building local installation folder ({path}): invalid path segment {segment:?}")]
    InvalidSegment { path: PathBuf, segment: String },

    // Registry config
    #[error("Error syncing .npmrc file ({source_path} -> {target_path}): {source}")]
    ConfigSync {
        source_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Installation
    #[error("Error cleaning the package install folder ({path}): {source}")]
    CleanFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to create package.json in {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to install package {name}@{version}: {reason}")]
    Install {
        name: String,
        version: String,
        reason: String,
    },

    #[error("Unable to create installed.flag file in {path}: {source}")]
    Marker {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to lock the package install folder ({path}): {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to determine the path to the {tool} tool: {reason}")]
    ToolNotFound { tool: String, reason: String },

    #[error("Unable to determine the runtime version: {0}")]
    RuntimeIdentity(String),

    // Execution
    #[error("Binary {bin} was not found at {path}")]
    BinaryNotFound { bin: String, path: PathBuf },

    #[error("Unable to run {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{bin} terminated without an exit code")]
    NoExitStatus { bin: String },

    // Configuration
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl InstallRunError {
    /// Wraps an I/O error with a short description of what was being attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSpecifier(_) => ErrorKind::Parse,
            Self::Resolution { .. } => ErrorKind::Resolution,
            Self::ProjectRootNotFound { .. }
            | Self::JoinPath { .. }
            | Self::InvalidSegment { .. } => ErrorKind::Path,
            Self::ConfigSync { .. } => ErrorKind::ConfigSync,
            Self::CleanFolder { .. }
            | Self::Manifest { .. }
            | Self::Install { .. }
            | Self::Marker { .. }
            | Self::Lock { .. }
            | Self::ToolNotFound { .. }
            | Self::RuntimeIdentity(_) => ErrorKind::Install,
            Self::BinaryNotFound { .. } | Self::Spawn { .. } | Self::NoExitStatus { .. } => {
                ErrorKind::Exec
            }
            Self::ConfigInvalid { .. } => ErrorKind::Config,
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}
