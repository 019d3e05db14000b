//! Builds the fixed set of tracked actions for a run.
//!
//! Explicitly configured repositories always come first; organization
//! listings add the rest, minus anything cached as unversioned.

use crate::config::Config;
use crate::core::{Origin, TrackedAction, VersionsResult};
use crate::di::TagSource;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

/// The tracked actions for one run
#[derive(Debug, Default)]
pub struct SourceList {
    /// Unique by identifier (case-insensitive), explicit entries first
    pub actions: Vec<TrackedAction>,
    /// Discovered repositories skipped because the cache marks them unversioned
    pub skipped: BTreeSet<String>,
}

/// Load the unversioned cache; a missing file is an empty cache
pub fn load_unversioned(path: &Path) -> VersionsResult<BTreeSet<String>> {
    if !path.exists() {
        return Ok(BTreeSet::new());
    }

    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Serialize the unversioned cache: sorted, one identifier per line
pub fn render_unversioned(ids: &BTreeSet<String>) -> String {
    ids.iter().map(|id| format!("{}\n", id)).collect()
}

/// Collect explicit and discovered actions.
pub async fn load_sources(
    config: &Config,
    source: &dyn TagSource,
    unversioned: &BTreeSet<String>,
) -> VersionsResult<SourceList> {
    let cached: HashSet<String> = unversioned.iter().map(|id| id.to_lowercase()).collect();
    let mut seen = HashSet::new();
    let mut list = SourceList::default();

    for action in config.tracked_repositories()? {
        if seen.insert(action.id().to_lowercase()) {
            list.actions.push(action);
        }
    }

    for org in &config.organizations {
        tracing::info!("Fetching repositories for {}", org);
        let repos = source.list_org_repos(org).await?;
        tracing::info!("Found {} repositories in {}", repos.len(), org);

        for repo in repos {
            let action = TrackedAction::new(org, &repo.name, Origin::Discovered)?;
            let key = action.id().to_lowercase();

            if seen.contains(&key) {
                continue;
            }

            if cached.contains(&key) {
                tracing::debug!("Skipping {} (cached as unversioned)", action);
                list.skipped.insert(action.id());
                continue;
            }

            seen.insert(key);
            list.actions.push(action);
        }
    }

    Ok(list)
}
