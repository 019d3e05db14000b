//! All-or-nothing publication of the rendered artifacts.
//!
//! Every output is rendered in memory first; files are only touched once
//! the whole plan has been built, and each write replaces its file atomically.

use crate::config::Config;
use crate::core::path::stage_write;
use crate::core::{ResolvedVersion, VersionsError, VersionsResult};
use crate::loader::render_unversioned;
use crate::render::{render, render_list};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One file's new contents
#[derive(Debug, Clone)]
pub struct PlannedWrite {
    pub path: PathBuf,
    pub contents: String,
    /// False when the file already holds exactly `contents`
    pub changed: bool,
}

/// Every write a publish would perform
#[derive(Debug, Default)]
pub struct PublishPlan {
    pub writes: Vec<PlannedWrite>,
}

impl PublishPlan {
    pub fn changed(&self) -> impl Iterator<Item = &PlannedWrite> {
        self.writes.iter().filter(|w| w.changed)
    }

    pub fn is_up_to_date(&self) -> bool {
        self.changed().next().is_none()
    }

    /// Write every changed file, returning the paths written.
    ///
    /// All contents are staged beside their targets before any target is
    /// replaced; a staging failure leaves every file as it was.
    pub fn apply(&self) -> VersionsResult<Vec<PathBuf>> {
        let staged = self
            .changed()
            .map(|write| stage_write(&write.path, &write.contents))
            .collect::<VersionsResult<Vec<_>>>()?;

        let mut written = Vec::with_capacity(staged.len());
        for write in staged {
            let path = write.target().to_path_buf();
            write.commit()?;
            tracing::info!("Updated {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

/// Renders resolved versions into the configured targets
pub struct Publisher {
    documents: Vec<PathBuf>,
    versions_file: Option<PathBuf>,
    unversioned_file: Option<PathBuf>,
}

impl Publisher {
    pub fn new(config: &Config) -> Self {
        Self {
            documents: config.documents.clone(),
            versions_file: config.versions_file.clone(),
            unversioned_file: config.unversioned_file.clone(),
        }
    }

    /// Build the full plan without touching any file.
    ///
    /// Fails on the first missing or malformed document.
    pub fn plan(
        &self,
        versions: &[ResolvedVersion],
        unversioned: &BTreeSet<String>,
    ) -> VersionsResult<PublishPlan> {
        let mut plan = PublishPlan::default();

        if let Some(path) = &self.versions_file {
            plan.writes.push(planned(path, render_list(versions))?);
        }

        for doc in &self.documents {
            let existing = fs::read_to_string(doc).map_err(|e| {
                VersionsError::Path(format!("Failed to read document {}: {}", doc.display(), e))
            })?;
            let contents = render(&existing, versions).map_err(|kind| VersionsError::Marker {
                path: doc.clone(),
                kind,
            })?;

            plan.writes.push(PlannedWrite {
                changed: contents != existing,
                path: doc.clone(),
                contents,
            });
        }

        if let Some(path) = &self.unversioned_file {
            plan.writes.push(planned(path, render_unversioned(unversioned))?);
        }

        Ok(plan)
    }
}

fn planned(path: &Path, contents: String) -> VersionsResult<PlannedWrite> {
    let changed = match fs::read_to_string(path) {
        Ok(existing) => existing != contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
        Err(e) => return Err(e.into()),
    };

    Ok(PlannedWrite {
        path: path.to_path_buf(),
        contents,
        changed,
    })
}
