//! Latest tag resolution.
//!
//! Each tracked action is resolved by walking a chain of [`Strategy`]s; the
//! first strategy that yields a tag wins. [`Resolver::resolve_all`] runs the
//! lookups on a bounded pool of tasks under a single run-wide timeout.

use crate::config::Config;
use crate::core::{
    Origin, RefType, ResolvedVersion, TrackedAction, VersionsError, VersionsResult,
};
use crate::di::TagSource;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};

/// How a tag is picked for a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Highest `vN` tag by numeric major
    Major,
    /// Latest published, non-prerelease release
    Release,
    /// First tag in the source's own order
    Tag,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Major => write!(f, "major"),
            Strategy::Release => write!(f, "release"),
            Strategy::Tag => write!(f, "tag"),
        }
    }
}

/// Result of resolving one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedVersion),
    /// A discovered repository with nothing to report
    Unversioned(TrackedAction),
}

/// Everything a run resolved, sorted by identifier
#[derive(Debug, Default)]
pub struct ResolveOutcome {
    pub versions: Vec<ResolvedVersion>,
    pub unversioned: Vec<TrackedAction>,
}

fn major_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^v([0-9]+)$").expect("static pattern"))
}

/// Digits of a `vN` tag without leading zeros, so that longer means larger
fn major_digits(tag: &str) -> Option<&str> {
    let digits = major_tag_pattern().captures(tag)?.get(1)?.as_str();
    Some(digits.trim_start_matches('0'))
}

fn cmp_numeric(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Pick the `vN` tag with the highest numeric N.
///
/// `v10` beats `v9`; `v1.2`, `V1` and `v1-beta` are ignored. N is unbounded,
/// and among equal majors (`v04`, `v4`) the first listed wins.
pub fn latest_major_tag<'a>(tags: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut best: Option<(&str, &str)> = None;

    for tag in tags {
        let tag = tag.trim();
        let Some(digits) = major_digits(tag) else {
            continue;
        };
        if best.map_or(true, |(top, _)| cmp_numeric(digits, top) == Ordering::Greater) {
            best = Some((digits, tag));
        }
    }

    best.map(|(_, tag)| tag.to_string())
}

/// Resolves tracked actions against a [`TagSource`]
pub struct Resolver {
    source: Arc<dyn TagSource>,
    fallback_chain: Vec<Strategy>,
    discovery_chain: Vec<Strategy>,
    concurrency: usize,
    timeout: Duration,
}

impl Resolver {
    pub fn new(source: Arc<dyn TagSource>, config: &Config) -> Self {
        Self {
            source,
            fallback_chain: config.fallback_chain.clone(),
            discovery_chain: config.discovery_chain.clone(),
            concurrency: config.concurrency.max(1),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn chain_for(&self, origin: Origin) -> &[Strategy] {
        match origin {
            Origin::Explicit => &self.fallback_chain,
            Origin::Discovered => &self.discovery_chain,
        }
    }

    /// Resolve a single action
    pub async fn resolve(&self, action: &TrackedAction) -> VersionsResult<Resolution> {
        resolve_with(
            self.source.as_ref(),
            self.chain_for(action.origin()),
            action,
        )
        .await
    }

    /// Resolve every action, failing the whole run on the first error or on timeout.
    pub async fn resolve_all(&self, actions: Vec<TrackedAction>) -> VersionsResult<ResolveOutcome> {
        let pb = progress_bar(actions.len());

        let run = async {
            let mut outcome = ResolveOutcome::default();
            let mut join_set = JoinSet::new();

            for action in actions {
                if join_set.len() >= self.concurrency {
                    // Wait for one task to complete before adding another
                    if let Some(joined) = join_set.join_next().await {
                        record(joined, &mut outcome, &pb)?;
                    }
                }

                let source = Arc::clone(&self.source);
                let chain = self.chain_for(action.origin()).to_vec();
                join_set.spawn(async move { resolve_with(source.as_ref(), &chain, &action).await });
            }

            while let Some(joined) = join_set.join_next().await {
                record(joined, &mut outcome, &pb)?;
            }

            Ok::<_, VersionsError>(outcome)
        };

        let result = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| VersionsError::Timeout(self.timeout.as_secs()));
        pb.finish_and_clear();

        let mut outcome = result??;
        outcome.versions.sort_by_key(|v| v.action.sort_key());
        outcome.unversioned.sort_by_key(|a| a.sort_key());

        tracing::info!(
            "Resolved {} action(s), {} unversioned",
            outcome.versions.len(),
            outcome.unversioned.len()
        );
        Ok(outcome)
    }
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    if let Ok(style) =
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} actions")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

fn record(
    joined: Result<VersionsResult<Resolution>, JoinError>,
    outcome: &mut ResolveOutcome,
    pb: &ProgressBar,
) -> VersionsResult<()> {
    let resolution = joined.map_err(|e| VersionsError::Resolution {
        action: "<worker>".to_string(),
        reason: format!("resolution task failed: {}", e),
    })??;

    pb.inc(1);
    match resolution {
        Resolution::Resolved(version) => {
            pb.println(format!("  ✓ {}", version));
            outcome.versions.push(version);
        }
        Resolution::Unversioned(action) => {
            pb.println(format!("  - {} (no matching tag)", action));
            outcome.unversioned.push(action);
        }
    }
    Ok(())
}

async fn resolve_with(
    source: &dyn TagSource,
    chain: &[Strategy],
    action: &TrackedAction,
) -> VersionsResult<Resolution> {
    for strategy in chain {
        tracing::debug!("Trying {} strategy for {}", strategy, action);

        match try_strategy(source, *strategy, action).await {
            Ok(Some((tag, ref_type))) => {
                tracing::debug!("{} resolved to {} via {}", action, tag, strategy);
                return Ok(Resolution::Resolved(ResolvedVersion::new(
                    action.clone(),
                    tag,
                    ref_type,
                )));
            }
            Ok(None) => continue,
            Err(e @ VersionsError::RateLimited { .. }) => return Err(e),
            Err(e) => return Err(VersionsError::resolution(action.id(), e)),
        }
    }

    match action.origin() {
        Origin::Discovered => Ok(Resolution::Unversioned(action.clone())),
        Origin::Explicit => Err(VersionsError::resolution(
            action.id(),
            format!(
                "no releases or tags matched ({})",
                chain
                    .iter()
                    .map(Strategy::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        )),
    }
}

async fn try_strategy(
    source: &dyn TagSource,
    strategy: Strategy,
    action: &TrackedAction,
) -> VersionsResult<Option<(String, RefType)>> {
    let (owner, repo) = (action.owner(), action.repo());

    match strategy {
        Strategy::Major => {
            let tags = source.list_tags(owner, repo).await?;
            Ok(latest_major_tag(tags.iter().map(|t| t.name.as_str())).map(|t| (t, RefType::Tag)))
        }
        Strategy::Release => Ok(source
            .latest_release(owner, repo)
            .await?
            .filter(|r| !r.draft && !r.prerelease)
            .map(|r| (r.tag_name, RefType::Release))),
        Strategy::Tag => Ok(source
            .first_tag(owner, repo)
            .await?
            .map(|t| (t.name, RefType::Tag))),
    }
}
