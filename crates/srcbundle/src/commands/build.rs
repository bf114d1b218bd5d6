//! The `build` command.

use super::Project;
use anyhow::Context;
use bytesize::ByteSize;
use srcbundle_core::{BuildOutcome, BundleBuilder, FileSource, ListSource, WalkSource};
use srcbundle_util::TimingGuard;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Options for `srcbundle build`.
#[derive(Debug, Default)]
pub struct BuildOptions {
    pub root: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub version_label: Option<String>,
    pub files_from: Option<PathBuf>,
    pub stdout: bool,
    pub compact: bool,
}

/// Run the full pipeline and write the bundle.
pub async fn handle_build(cwd: &Path, options: BuildOptions) -> anyhow::Result<()> {
    let _timing = TimingGuard::command("build");

    let mut project = Project::open(cwd, options.root).await?;
    if let Some(output) = options.output {
        project.config.output = Some(cwd.join(output));
    }
    if options.compact {
        project.config.pretty = Some(false);
    }

    let version = project.version(options.version_label).await;
    let source = file_source(&project.root, options.files_from.as_deref()).await?;
    let store = project.store();

    let outcome = BundleBuilder::new(&project.root, project.config.clone(), &version.label)
        .build(source.as_ref(), &store)
        .await?;
    print_warnings(&outcome);

    let pretty = project.config.pretty();
    let destination = if options.stdout {
        println!("{}", outcome.bundle.to_json(pretty)?);
        "stdout".to_string()
    } else {
        let path = project.config.output_path(&project.root);
        outcome
            .bundle
            .write(&path, pretty)
            .await
            .with_context(|| format!("failed to write bundle to {}", path.display()))?;
        path.display().to_string()
    };

    eprintln!("{} -> {}", summary(&outcome, &version.to_string()), destination);
    Ok(())
}

/// Pick the enumeration collaborator. `-` reads the list from stdin.
pub async fn file_source(
    root: &Path,
    files_from: Option<&Path>,
) -> anyhow::Result<Box<dyn FileSource>> {
    match files_from {
        None => Ok(Box::new(WalkSource::new(root))),
        Some(path) if path == Path::new("-") => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("failed to read file list from stdin")?;
            Ok(Box::new(ListSource::parse(&text)))
        }
        Some(path) => Ok(Box::new(ListSource::from_file(path).await?)),
    }
}

pub(crate) fn print_warnings(outcome: &BuildOutcome) {
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
}

fn summary(outcome: &BuildOutcome, version: &str) -> String {
    let stats = &outcome.bundle.stats;
    let mut line = format!(
        "Bundled {} files and {} images ({}) at version {}",
        stats.total_files,
        stats.total_images,
        ByteSize(stats.total_size),
        version
    );

    match &outcome.bundle.changes {
        Some(changes) => {
            let from = changes.from_version.as_deref().unwrap_or("?");
            line.push_str(&format!(
                ", {} changes since {} (+{} -{})",
                changes.changes.len(),
                from,
                changes.summary.total_additions,
                changes.summary.total_deletions
            ));
        }
        None if outcome.previous_version.is_none() => line.push_str(", first snapshot"),
        None => {}
    }
    line
}
