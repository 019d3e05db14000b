use std::path::PathBuf;
use thiserror::Error;

pub type VersionsResult<T> = Result<T, VersionsError>;

/// Ways a versioned document's marker region can be malformed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerError {
    #[error("start marker not found")]
    MissingStart,

    #[error("end marker not found")]
    MissingEnd,

    #[error("end marker appears before start marker")]
    OutOfOrder,

    #[error("marker appears more than once")]
    Duplicate,
}

#[derive(Error, Debug)]
pub enum VersionsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GitHub API error: {0}")]
    GitHub(String),

    #[error("GitHub API rate limit exceeded (resets in {reset_in_secs}s)")]
    RateLimited { reset_in_secs: u64 },

    /// A tracked action could not be resolved to a tag.
    /// Aborts the whole run; nothing is published.
    #[error("Failed to resolve {action}: {reason}")]
    Resolution { action: String, reason: String },

    /// A target document has a missing or malformed marker region.
    #[error("Malformed document {}: {kind}", path.display())]
    Marker { path: PathBuf, kind: MarkerError },

    #[error("Resolution timed out after {0}s")]
    Timeout(u64),

    /// `check` found published files that no longer match the resolved versions.
    #[error("{0} published file(s) are out of date")]
    Stale(usize),
}

impl VersionsError {
    /// Wrap any error as a resolution failure for `action`.
    pub fn resolution(action: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        VersionsError::Resolution {
            action: action.into(),
            reason: reason.to_string(),
        }
    }
}
