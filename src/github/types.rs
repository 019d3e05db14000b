//! GitHub API type definitions

use serde::{Deserialize, Serialize};

/// GitHub release information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// GitHub tag information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubTag {
    pub name: String,
    #[serde(default)]
    pub commit: Option<TagCommit>,
}

/// Commit information in a tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCommit {
    pub sha: String,
}

/// GitHub repository information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
}

/// Body GitHub sends alongside non-success statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_ignores_extra_fields() {
        let json = r#"{"name":"v4","commit":{"sha":"abc","url":"https://x"},"zipball_url":"z"}"#;
        let tag: GitHubTag = serde_json::from_str(json).unwrap();
        assert_eq!(tag.name, "v4");
        assert_eq!(tag.commit.unwrap().sha, "abc");
    }

    #[test]
    fn test_release_defaults() {
        let release: GitHubRelease = serde_json::from_str(r#"{"tag_name":"v1.2.3"}"#).unwrap();
        assert_eq!(release.tag_name, "v1.2.3");
        assert!(!release.draft);
        assert!(!release.prerelease);
    }
}
