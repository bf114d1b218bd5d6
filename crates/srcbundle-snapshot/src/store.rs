//! Snapshot persistence.

use crate::{LoadedSnapshot, Snapshot, SnapshotError, SnapshotResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default file name of the snapshot inside the project state directory.
pub const SNAPSHOT_FILE_NAME: &str = "snapshot.json";

/// Single-owner handle on the persisted snapshot file.
///
/// The store holds exactly one snapshot: every [`save`](Self::save) replaces
/// the previous content wholesale. Concurrent builds against the same file are
/// not coordinated; run one build at a time.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<state_dir>/snapshot.json`.
    pub fn in_dir(state_dir: &Path) -> Self {
        Self::new(state_dir.join(SNAPSHOT_FILE_NAME))
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the last persisted snapshot.
    ///
    /// Never fails. Missing, unreadable and corrupt files are all `Absent`.
    pub async fn load(&self) -> LoadedSnapshot {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "No readable snapshot");
                return LoadedSnapshot::Absent;
            }
        };

        match serde_json::from_str::<Snapshot>(&content) {
            Ok(snapshot) => {
                debug!(
                    path = %self.path.display(),
                    version = %snapshot.version,
                    files = snapshot.len(),
                    "Loaded snapshot"
                );
                LoadedSnapshot::Loaded(snapshot)
            }
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Ignoring corrupt snapshot");
                LoadedSnapshot::Absent
            }
        }
    }

    /// Persist a snapshot, replacing whatever was stored before.
    ///
    /// Writes to a temporary sibling file and renames it into place.
    pub async fn save(&self, snapshot: &Snapshot) -> SnapshotResult<()> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| SnapshotError::invalid_path(&self.path))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(snapshot)?;

        let mut temp_name = file_name.to_os_string();
        temp_name.push(".tmp");
        let temp_path = self.path.with_file_name(temp_name);
        fs::write(&temp_path, &content).await?;
        fs::rename(&temp_path, &self.path).await?;

        info!(
            path = %self.path.display(),
            version = %snapshot.version,
            files = snapshot.len(),
            "Saved snapshot"
        );

        Ok(())
    }
}
