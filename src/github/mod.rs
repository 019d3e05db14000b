//! GitHub integration
//!
//! This module provides functionality for interacting with GitHub to:
//! - List an organization's repositories
//! - Fetch tags and the latest release of a repository
//! - Back off and retry when the API reports a rate limit

pub mod client;
pub mod types;

pub use client::GitHubClient;
pub use types::{GitHubRelease, GitHubRepo, GitHubTag};
