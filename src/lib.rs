//! action-versions: tracks the latest release tags of GitHub Actions
//!
//! The pipeline is one-way: [`loader`] builds the tracked set, [`resolver`]
//! finds each action's latest tag, [`render`] turns the result into text and
//! [`publish`] writes it out only when every step succeeded.

pub use versions_core::{
    format_error_with_help, ErrorHelp, MarkerError, Origin, RefType, ResolvedVersion,
    TrackedAction, VersionsError, VersionsResult,
};

/// Core module re-exported from versions-core.
pub mod core {
    pub use versions_core::core::*;
    pub use versions_core::{format_error_with_help, ErrorHelp};
}

/// Configuration management.
pub mod config;

/// Dependency injection infrastructure.
pub mod di;

/// GitHub API client.
pub mod github;

/// Tracked action list.
pub mod loader;

/// Latest tag resolution.
pub mod resolver;

/// Text rendering and marker splicing.
pub mod render;

/// Atomic publication of rendered files.
pub mod publish;
