pub mod action;
pub mod error;
pub mod error_help;
pub mod path;

pub use action::{Origin, RefType, ResolvedVersion, TrackedAction};
pub use error::{MarkerError, VersionsError, VersionsResult};
