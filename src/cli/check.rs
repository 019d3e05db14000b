use action_versions::core::{VersionsError, VersionsResult};
use action_versions::publish::Publisher;
use std::path::Path;

pub async fn run(config_path: &Path, concurrency: Option<usize>) -> VersionsResult<()> {
    let config = super::load_config(config_path, concurrency)?;
    let run = super::resolve(&config).await?;
    let plan = Publisher::new(&config).plan(&run.outcome.versions, &run.unversioned)?;

    let stale: Vec<_> = plan.changed().collect();
    if stale.is_empty() {
        println!("✓ All published files are up to date");
        return Ok(());
    }

    for write in &stale {
        println!("  ✗ {} is out of date", write.path.display());
    }
    Err(VersionsError::Stale(stale.len()))
}
