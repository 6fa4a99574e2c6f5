//! Error taxonomy for the assembly engine
//!
//! The orchestration layers (TUI, binaries) wrap these in `anyhow` with extra
//! context; the engine itself only ever returns `ScaffoldError`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while resolving, assembling and writing a project
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// The registry could not be reached (DNS, connect, TLS, body read)
    #[error("registry unavailable while resolving '{package}': {reason}")]
    RegistryUnavailable { package: String, reason: String },

    /// The registry answered, but the package or dist-tag does not exist
    #[error("package '{package}' has no '{tag}' version in the registry")]
    PackageNotFound { package: String, tag: String },

    /// One lookup in a batch failed; the whole batch is discarded
    #[error("failed to resolve dependency '{package}'")]
    DependencyResolutionFailed {
        package: String,
        #[source]
        source: Box<ScaffoldError>,
    },

    /// Two feature contributions declared the same package
    #[error("dependency '{package}' was declared twice")]
    DependencyCollision { package: String },

    /// Flags that can never come out of the prompt flow
    #[error("invalid feature combination: {0}")]
    InvalidFeatureCombination(String),

    /// A directory entry already exists; callers treat this as a skip
    #[error("'{}' already exists", path.display())]
    FileSystemConflict { path: PathBuf },

    #[error("invalid registry URL '{url}': {reason}")]
    InvalidRegistryUrl { url: String, reason: String },

    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ScaffoldError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Name of the package that caused a resolution failure, if any
    pub fn failing_package(&self) -> Option<&str> {
        match self {
            Self::RegistryUnavailable { package, .. }
            | Self::PackageNotFound { package, .. }
            | Self::DependencyResolutionFailed { package, .. }
            | Self::DependencyCollision { package } => Some(package),
            _ => None,
        }
    }
}

pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;
