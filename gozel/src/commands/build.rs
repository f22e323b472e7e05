//! Variant builds

use super::{CommandResult, load_project};
use convenient_golang::Launcher;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Build the named variants (all when `variants` is empty), `jobs` at a time.
pub async fn execute(config: &Path, variants: &[String], jobs: usize) -> CommandResult<()> {
    let start = Instant::now();
    let (project, set) = load_project(config).await?;
    let tasks = set.select(variants)?;

    if tasks.is_empty() {
        println!("No variants configured in {}", config.display());
        return Ok(());
    }

    info!(
        "Building {} variant(s) of {} with {} job(s)",
        tasks.len(),
        set.module_dir().display(),
        jobs
    );

    let launcher = Launcher::from_process_env(project.compiler());
    let reports = launcher.run_all(tasks, jobs).await?;

    for report in &reports {
        println!(
            "  ✓ {:<32} {:>6.2}s  {}",
            report.task,
            report.duration.as_secs_f64(),
            report.output_dir.display()
        );
    }
    println!(
        "Built {} variant(s) in {:.2}s",
        reports.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
