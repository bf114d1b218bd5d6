//! Command handlers for the srcbundle CLI.

pub mod build;
pub mod inspect;
pub mod logging;
pub mod status;

pub use build::*;
pub use inspect::*;
pub use logging::*;
pub use status::*;

use srcbundle_core::{Config, VersionLabel};
use srcbundle_snapshot::SnapshotStore;
use srcbundle_util::path::find_project_root;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A project root with its loaded configuration.
pub struct Project {
    pub root: PathBuf,
    pub config: Config,
    pub sources: Vec<PathBuf>,
}

impl Project {
    /// Resolve the root and load its config.
    ///
    /// Without `--root`, the nearest ancestor of `cwd` holding a manifest or
    /// `.git` is used, falling back to `cwd` itself.
    pub async fn open(cwd: &Path, root: Option<PathBuf>) -> anyhow::Result<Self> {
        let root = match root {
            Some(root) => cwd.join(root),
            None => find_project_root(cwd).unwrap_or_else(|| cwd.to_path_buf()),
        };
        let (config, sources) = Config::load(&root).await?;
        debug!(root = %root.display(), config_files = sources.len(), "Opened project");

        Ok(Self {
            root,
            config,
            sources,
        })
    }

    pub fn store(&self) -> SnapshotStore {
        SnapshotStore::new(self.config.snapshot_path(&self.root))
    }

    /// `--version-label` wins over the project manifests.
    pub async fn version(&self, explicit: Option<String>) -> VersionLabel {
        match explicit {
            Some(label) => VersionLabel::explicit(label),
            None => VersionLabel::resolve(&self.root).await,
        }
    }
}
