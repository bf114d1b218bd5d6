//! Read-only commands: `snapshot`, `tree` and `config`.

use super::Project;
use srcbundle_core::tree::{self, build_tree};
use srcbundle_core::{BundleBuilder, WalkSource};
use srcbundle_snapshot::LoadedSnapshot;
use std::path::{Path, PathBuf};

/// Print the stored snapshot's version, date and file count.
pub async fn handle_snapshot(cwd: &Path, root: Option<PathBuf>) -> anyhow::Result<()> {
    let project = Project::open(cwd, root).await?;
    let store = project.store();

    match store.load().await {
        LoadedSnapshot::Loaded(snapshot) => {
            println!("Snapshot: {}", store.path().display());
            println!("Version: {}", snapshot.version);
            println!("Date: {}", snapshot.date.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("Files: {}", snapshot.len());
        }
        LoadedSnapshot::Absent => {
            println!("No snapshot at {}", store.path().display());
        }
    }
    Ok(())
}

/// Print the project tree as the bundle would contain it.
///
/// Files that would later be skipped on read (binary, too large) are still
/// listed.
pub async fn handle_tree(cwd: &Path, root: Option<PathBuf>) -> anyhow::Result<()> {
    let project = Project::open(cwd, root).await?;
    let builder = BundleBuilder::new(&project.root, project.config.clone(), "");

    let paths: Vec<String> = builder
        .eligible_paths(&WalkSource::new(&project.root))
        .await?
        .into_iter()
        .collect();
    let nodes = build_tree(&paths);

    print!("{}", tree::render(&nodes));
    println!();
    println!("{} files", tree::count_files(&nodes));
    Ok(())
}

/// Print the merged configuration and where it came from.
pub async fn handle_config(cwd: &Path, root: Option<PathBuf>) -> anyhow::Result<()> {
    let project = Project::open(cwd, root).await?;

    println!("Configuration sources:");
    if project.sources.is_empty() {
        println!("  (none)");
    } else {
        for source in &project.sources {
            println!("  {}", source.display());
        }
    }
    println!();

    println!("Current configuration:");
    println!("{}", serde_json::to_string_pretty(&project.config)?);
    println!();
    println!("Output: {}", project.config.output_path(&project.root).display());
    println!("Snapshot: {}", project.config.snapshot_path(&project.root).display());

    Ok(())
}
