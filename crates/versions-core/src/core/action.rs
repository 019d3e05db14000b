use crate::core::error::{VersionsError, VersionsResult};
use std::fmt;

/// Where a tracked action came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Listed by name in the configuration
    Explicit,
    /// Found by listing an organization's repositories
    Discovered,
}

/// An `owner/repo` whose latest tag is reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackedAction {
    owner: String,
    repo: String,
    origin: Origin,
}

impl TrackedAction {
    pub fn new(owner: &str, repo: &str, origin: Origin) -> VersionsResult<Self> {
        for part in [owner, repo] {
            if part.is_empty() || part.contains('/') || part.chars().any(char::is_whitespace) {
                return Err(VersionsError::Config(format!(
                    "Invalid action identifier '{}/{}': expected owner/repo",
                    owner, repo
                )));
            }
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            origin,
        })
    }

    /// Parse an `owner/repo` identifier.
    pub fn parse(id: &str, origin: Origin) -> VersionsResult<Self> {
        let (owner, repo) = id.split_once('/').ok_or_else(|| {
            VersionsError::Config(format!(
                "Invalid action identifier '{}': expected owner/repo",
                id
            ))
        })?;
        Self::new(owner, repo, origin)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn id(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Case-insensitive ordering with the exact identifier as tie-break.
    pub fn sort_key(&self) -> (String, String) {
        let id = self.id();
        (id.to_lowercase(), id)
    }
}

impl fmt::Display for TrackedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Kind of Git reference a tag was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefType {
    Release,
    Tag,
}

impl fmt::Display for RefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefType::Release => write!(f, "release"),
            RefType::Tag => write!(f, "tag"),
        }
    }
}

/// A tracked action paired with its latest tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub action: TrackedAction,
    pub tag: String,
    pub ref_type: RefType,
}

impl ResolvedVersion {
    pub fn new(action: TrackedAction, tag: impl Into<String>, ref_type: RefType) -> Self {
        Self {
            action,
            tag: tag.into(),
            ref_type,
        }
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.action, self.tag)
    }
}
