//! Mock implementations of service traits for testing

use super::traits::TagSource;
use crate::core::{VersionsError, VersionsResult};
use crate::github::types::{GitHubRelease, GitHubRepo, GitHubTag};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// In-memory tag source for testing
///
/// Repositories that were never registered behave like a 404.
///
/// # Example
///
/// ```
/// use action_versions::di::mocks::MockTagSource;
///
/// let source = MockTagSource::new();
/// source.add_tags("actions", "checkout", &["v5", "v4"]);
/// source.add_org_repos("actions", &["checkout"]);
/// ```
#[derive(Clone, Default)]
pub struct MockTagSource {
    tags: Arc<Mutex<HashMap<String, Vec<String>>>>,
    releases: Arc<Mutex<HashMap<String, GitHubRelease>>>,
    orgs: Arc<Mutex<HashMap<String, Vec<String>>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockTagSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository with the given tags (in source order)
    pub fn add_tags(&self, owner: &str, repo: &str, tags: &[&str]) {
        self.tags.lock().unwrap().insert(
            key(owner, repo),
            tags.iter().map(|t| t.to_string()).collect(),
        );
    }

    /// Register a latest release; also registers the repository if needed
    pub fn add_release(&self, owner: &str, repo: &str, tag: &str, prerelease: bool) {
        self.tags
            .lock()
            .unwrap()
            .entry(key(owner, repo))
            .or_default();
        self.releases.lock().unwrap().insert(
            key(owner, repo),
            GitHubRelease {
                tag_name: tag.to_string(),
                name: None,
                draft: false,
                prerelease,
                published_at: None,
            },
        );
    }

    pub fn add_org_repos(&self, org: &str, repos: &[&str]) {
        self.orgs.lock().unwrap().insert(
            org.to_string(),
            repos.iter().map(|r| r.to_string()).collect(),
        );
    }

    /// Make every call for this repository fail like a network error
    pub fn fail(&self, owner: &str, repo: &str) {
        self.failing.lock().unwrap().insert(key(owner, repo));
    }

    /// Every call made so far, as `method owner/repo`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &str, target: &str) -> VersionsResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", method, target));
        if self.failing.lock().unwrap().contains(target) {
            return Err(VersionsError::GitHub(format!(
                "Request for {} failed: connection reset",
                target
            )));
        }
        Ok(())
    }

    fn known_tags(&self, owner: &str, repo: &str) -> VersionsResult<Vec<String>> {
        self.tags
            .lock()
            .unwrap()
            .get(&key(owner, repo))
            .cloned()
            .ok_or_else(|| {
                VersionsError::GitHub(format!("{} not found or inaccessible", key(owner, repo)))
            })
    }
}

fn key(owner: &str, repo: &str) -> String {
    format!("{}/{}", owner, repo)
}

fn to_tag(name: String) -> GitHubTag {
    GitHubTag { name, commit: None }
}

#[async_trait]
impl TagSource for MockTagSource {
    async fn list_org_repos(&self, org: &str) -> VersionsResult<Vec<GitHubRepo>> {
        self.record("list_org_repos", org)?;
        let repos = self
            .orgs
            .lock()
            .unwrap()
            .get(org)
            .cloned()
            .ok_or_else(|| VersionsError::GitHub(format!("{} not found or inaccessible", org)))?;

        Ok(repos
            .into_iter()
            .map(|name| GitHubRepo { name })
            .collect())
    }

    async fn list_tags(&self, owner: &str, repo: &str) -> VersionsResult<Vec<GitHubTag>> {
        self.record("list_tags", &key(owner, repo))?;
        Ok(self
            .known_tags(owner, repo)?
            .into_iter()
            .map(to_tag)
            .collect())
    }

    async fn first_tag(&self, owner: &str, repo: &str) -> VersionsResult<Option<GitHubTag>> {
        self.record("first_tag", &key(owner, repo))?;
        Ok(self.known_tags(owner, repo)?.into_iter().next().map(to_tag))
    }

    async fn latest_release(
        &self,
        owner: &str,
        repo: &str,
    ) -> VersionsResult<Option<GitHubRelease>> {
        self.record("latest_release", &key(owner, repo))?;
        Ok(self.releases.lock().unwrap().get(&key(owner, repo)).cloned())
    }
}
