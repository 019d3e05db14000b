use crate::core::path::{config_root, resolve_relative};
use crate::core::{Origin, TrackedAction, VersionsError, VersionsResult};
use crate::resolver::Strategy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub REST API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API token (GITHUB_TOKEN in the environment takes precedence)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Organizations whose repositories are all tracked
    #[serde(default = "default_organizations")]
    pub organizations: Vec<String>,

    /// Individually tracked `owner/repo` identifiers
    #[serde(default = "default_repositories")]
    pub repositories: Vec<String>,

    /// Strategies tried in order for explicitly listed repositories
    /// - "major": highest `vN` tag
    /// - "release": the latest published release
    /// - "tag": the first tag in the API's own order
    #[serde(default = "default_fallback_chain")]
    pub fallback_chain: Vec<Strategy>,

    /// Strategies tried in order for repositories found by org discovery
    #[serde(default = "default_discovery_chain")]
    pub discovery_chain: Vec<Strategy>,

    /// Documents whose marker region receives the version list
    #[serde(default = "default_documents")]
    pub documents: Vec<PathBuf>,

    /// Plain-text list of `owner/repo@tag` lines
    #[serde(default = "default_versions_file")]
    pub versions_file: Option<PathBuf>,

    /// Cache of discovered repositories known to have no selectable tag
    #[serde(default = "default_unversioned_file")]
    pub unversioned_file: Option<PathBuf>,

    /// Maximum number of repositories resolved at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Upper bound for a whole resolution run
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after a rate-limit response before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Longest rate-limit wait that is honored instead of failing
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,

    /// Page size for list endpoints (GitHub caps this at 100)
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_organizations() -> Vec<String> {
    vec!["actions".to_string()]
}

fn default_repositories() -> Vec<String> {
    vec!["astral-sh/setup-uv".to_string()]
}

fn default_fallback_chain() -> Vec<Strategy> {
    vec![Strategy::Major, Strategy::Release, Strategy::Tag]
}

fn default_discovery_chain() -> Vec<Strategy> {
    vec![Strategy::Major]
}

fn default_documents() -> Vec<PathBuf> {
    vec![PathBuf::from("README.md")]
}

fn default_versions_file() -> Option<PathBuf> {
    Some(PathBuf::from("versions.txt"))
}

fn default_unversioned_file() -> Option<PathBuf> {
    Some(PathBuf::from("unversioned.txt"))
}

fn default_concurrency() -> usize {
    8
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_max_retries() -> u32 {
    3
}

fn default_max_backoff_secs() -> u64 {
    900
}

fn default_per_page() -> u32 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token: None,
            organizations: default_organizations(),
            repositories: default_repositories(),
            fallback_chain: default_fallback_chain(),
            discovery_chain: default_discovery_chain(),
            documents: default_documents(),
            versions_file: default_versions_file(),
            unversioned_file: default_unversioned_file(),
            concurrency: default_concurrency(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            max_backoff_secs: default_max_backoff_secs(),
            per_page: default_per_page(),
        }
    }
}

impl Config {
    /// Load config from `path`, falling back to defaults when the file doesn't exist.
    ///
    /// Relative paths in the file are resolved against the file's directory.
    pub fn load(path: &Path) -> VersionsResult<Self> {
        let config = if path.exists() {
            let content = fs::read_to_string(path)?;
            Self::from_yaml(&content)?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        Ok(config.rooted_at(&config_root(path)))
    }

    /// Parse and validate a YAML config
    pub fn from_yaml(content: &str) -> VersionsResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| VersionsError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> VersionsResult<()> {
        if self.fallback_chain.is_empty() {
            return Err(VersionsError::Config(
                "fallback_chain must name at least one strategy".to_string(),
            ));
        }
        if self.discovery_chain.is_empty() {
            return Err(VersionsError::Config(
                "discovery_chain must name at least one strategy".to_string(),
            ));
        }
        if self.concurrency == 0 {
            return Err(VersionsError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.per_page == 0 || self.per_page > 100 {
            return Err(VersionsError::Config(format!(
                "per_page must be between 1 and 100, got {}",
                self.per_page
            )));
        }
        self.tracked_repositories()?;
        Ok(())
    }

    /// Explicitly listed repositories, parsed
    pub fn tracked_repositories(&self) -> VersionsResult<Vec<TrackedAction>> {
        self.repositories
            .iter()
            .map(|id| TrackedAction::parse(id.trim(), Origin::Explicit))
            .collect()
    }

    /// Token from the environment, then from the config file
    pub fn resolve_token(&self) -> Option<String> {
        std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.token.clone())
    }

    fn rooted_at(mut self, root: &Path) -> Self {
        self.documents = self
            .documents
            .iter()
            .map(|doc| resolve_relative(root, doc))
            .collect();
        self.versions_file = self.versions_file.map(|p| resolve_relative(root, &p));
        self.unversioned_file = self.unversioned_file.map(|p| resolve_relative(root, &p));
        self
    }
}
