//! Human-oriented hints attached to errors before they reach the terminal.

use crate::core::error::{MarkerError, VersionsError};

/// Suggests a remediation for an error, when one is known.
pub trait ErrorHelp {
    fn help(&self) -> Option<String>;
}

impl ErrorHelp for VersionsError {
    fn help(&self) -> Option<String> {
        match self {
            VersionsError::RateLimited { .. } => Some(
                "Set GITHUB_TOKEN to raise the limit from 60 to 5000 requests per hour, \
                 or lower `concurrency` in versions.yaml."
                    .to_string(),
            ),
            VersionsError::Marker { kind, .. } => match kind {
                MarkerError::MissingStart | MarkerError::MissingEnd => Some(
                    "Add `<!-- VERSIONS_START -->` and `<!-- VERSIONS_END -->` on their own lines \
                     where the version list should go."
                        .to_string(),
                ),
                MarkerError::OutOfOrder => {
                    Some("The start marker must come before the end marker.".to_string())
                }
                MarkerError::Duplicate => {
                    Some("Keep exactly one marker region per document.".to_string())
                }
            },
            VersionsError::Resolution { reason, .. } if reason.contains("not found") => Some(
                "Check the identifier in versions.yaml; private repositories need a token \
                 with read access."
                    .to_string(),
            ),
            VersionsError::Timeout(_) => {
                Some("Raise `timeout_secs` in versions.yaml or retry later.".to_string())
            }
            VersionsError::Stale(_) => {
                Some("Run `action-versions update` and commit the result.".to_string())
            }
            VersionsError::Http(_) => Some(
                "Check network access to `api_url` in versions.yaml.".to_string(),
            ),
            VersionsError::Config(_) | VersionsError::Yaml(_) => {
                Some("See versions.yaml; every field is optional.".to_string())
            }
            _ => None,
        }
    }
}

/// Render an error with its hint for display on stderr.
pub fn format_error_with_help(error: &VersionsError) -> String {
    match error.help() {
        Some(help) => format!("error: {}\n\nhelp: {}", error, help),
        None => format!("error: {}", error),
    }
}
