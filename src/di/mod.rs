//! Dependency injection infrastructure
//!
//! The resolver and loader talk to GitHub only through [`TagSource`], so
//! tests can swap in [`mocks::MockTagSource`] instead of a live client.
//!
//! # Example (Testing)
//! ```
//! use action_versions::di::{mocks::MockTagSource, TagSource};
//! use std::sync::Arc;
//!
//! let source: Arc<dyn TagSource> = Arc::new(MockTagSource::new());
//! ```

pub mod mocks;
pub mod traits;

pub use traits::TagSource;
