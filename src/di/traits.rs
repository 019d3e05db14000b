//! Trait definitions for dependency injection

use crate::core::VersionsResult;
use crate::github::types::{GitHubRelease, GitHubRepo, GitHubTag};
use async_trait::async_trait;

/// Read-only view of a releases/tags source keyed by `owner/repo`.
///
/// Implementations should be thread-safe (Send + Sync); the resolver shares
/// one instance across its worker tasks.
#[async_trait]
pub trait TagSource: Send + Sync {
    /// List every repository in an organization
    async fn list_org_repos(&self, org: &str) -> VersionsResult<Vec<GitHubRepo>>;

    /// List every tag of a repository, in the source's order
    async fn list_tags(&self, owner: &str, repo: &str) -> VersionsResult<Vec<GitHubTag>>;

    /// The first tag in the source's order, if any
    async fn first_tag(&self, owner: &str, repo: &str) -> VersionsResult<Option<GitHubTag>>;

    /// The latest published release, if any
    async fn latest_release(&self, owner: &str, repo: &str)
        -> VersionsResult<Option<GitHubRelease>>;
}
