//! The `status` command: a build that persists nothing.

use super::build::print_warnings;
use super::Project;
use srcbundle_core::{BundleBuilder, WalkSource};
use srcbundle_snapshot::VersionChanges;
use std::path::{Path, PathBuf};

/// Show what the next build would report.
pub async fn handle_status(
    cwd: &Path,
    root: Option<PathBuf>,
    version_label: Option<String>,
) -> anyhow::Result<()> {
    let project = Project::open(cwd, root).await?;
    let version = project.version(version_label).await;
    let store = project.store();

    let outcome = BundleBuilder::new(&project.root, project.config.clone(), &version.label)
        .dry_run(true)
        .build(&WalkSource::new(&project.root), &store)
        .await?;
    print_warnings(&outcome);

    println!("Version: {} (from {})", version, version.source);
    match &outcome.previous_version {
        Some(previous) => println!("Snapshot: {previous}"),
        None => println!("Snapshot: none"),
    }
    println!();

    match &outcome.bundle.changes {
        Some(changes) => print_changes(changes),
        None if outcome.previous_version.is_none() => {
            println!("No changes tracked: the next build records the first snapshot.");
        }
        None => println!("No changes tracked: version {version} is already recorded."),
    }

    Ok(())
}

fn print_changes(changes: &VersionChanges) {
    if changes.is_empty() {
        println!("No file changes since {}.", changes.from_version.as_deref().unwrap_or("?"));
        return;
    }

    println!(
        "Changes since {}:",
        changes.from_version.as_deref().unwrap_or("?")
    );
    for change in &changes.changes {
        println!(
            "  {:<9} {:<50} +{} -{}",
            change.kind.to_string(),
            change.path,
            change.additions,
            change.deletions
        );
    }
    println!();

    let summary = &changes.summary;
    println!(
        "{} files changed: {} added, {} modified, {} deleted (+{} -{})",
        summary.total(),
        summary.added_count,
        summary.modified_count,
        summary.deleted_count,
        summary.total_additions,
        summary.total_deletions
    );
}
