pub mod check;
pub mod update;

use action_versions::config::Config;
use action_versions::core::VersionsResult;
use action_versions::di::TagSource;
use action_versions::github::GitHubClient;
use action_versions::loader::{load_sources, load_unversioned};
use action_versions::resolver::{ResolveOutcome, Resolver};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Load config and apply command-line overrides
pub fn load_config(path: &Path, concurrency: Option<usize>) -> VersionsResult<Config> {
    let mut config = Config::load(path)?;
    if let Some(concurrency) = concurrency {
        config.concurrency = concurrency;
    }
    config.validate()?;
    Ok(config)
}

/// Everything needed to publish: resolved versions plus the next unversioned cache
pub struct RunResult {
    pub outcome: ResolveOutcome,
    pub unversioned: BTreeSet<String>,
}

/// Load the tracked set and resolve it against GitHub
pub async fn resolve(config: &Config) -> VersionsResult<RunResult> {
    let client: Arc<dyn TagSource> = Arc::new(GitHubClient::new(config)?);

    let cached = match &config.unversioned_file {
        Some(path) => load_unversioned(path)?,
        None => BTreeSet::new(),
    };
    if !cached.is_empty() {
        eprintln!("Loaded {} known unversioned repos from cache", cached.len());
    }

    let sources = load_sources(config, client.as_ref(), &cached).await?;
    eprintln!(
        "Resolving {} action(s) ({} skipped as unversioned)...",
        sources.actions.len(),
        sources.skipped.len()
    );

    let outcome = Resolver::new(Arc::clone(&client), config)
        .resolve_all(sources.actions)
        .await?;

    let mut unversioned = sources.skipped;
    unversioned.extend(outcome.unversioned.iter().map(|a| a.id()));

    Ok(RunResult {
        outcome,
        unversioned,
    })
}
