//! Core types shared by the action-versions crates: tracked actions,
//! resolved versions, the error taxonomy, and file helpers.

pub mod core;

pub use crate::core::error_help::{format_error_with_help, ErrorHelp};
pub use crate::core::{
    MarkerError, Origin, RefType, ResolvedVersion, TrackedAction, VersionsError, VersionsResult,
};
