use action_versions::core::VersionsResult;
use action_versions::publish::Publisher;
use action_versions::render::render_list;
use std::path::Path;

pub async fn run(
    config_path: &Path,
    dry_run: bool,
    concurrency: Option<usize>,
) -> VersionsResult<()> {
    let config = super::load_config(config_path, concurrency)?;
    let run = super::resolve(&config).await?;

    // Render everything before writing anything
    let plan = Publisher::new(&config).plan(&run.outcome.versions, &run.unversioned)?;

    if dry_run {
        print!("{}", render_list(&run.outcome.versions));
        for write in plan.changed() {
            eprintln!("  would update {}", write.path.display());
        }
        return Ok(());
    }

    let written = plan.apply()?;
    for path in &written {
        println!("  ✓ Updated {}", path.display());
    }

    println!(
        "\nWrote {} versions, cached {} unversioned repos",
        run.outcome.versions.len(),
        run.unversioned.len()
    );
    if written.is_empty() {
        println!("Everything was already up to date");
    }

    Ok(())
}
