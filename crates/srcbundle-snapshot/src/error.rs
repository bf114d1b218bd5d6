//! Snapshot error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors that can occur while persisting a snapshot.
///
/// Loading never fails: a missing or corrupt snapshot is reported as
/// [`LoadedSnapshot::Absent`](crate::LoadedSnapshot::Absent).
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot path cannot be written to.
    #[error("Invalid snapshot path: {}", .0.display())]
    InvalidPath(PathBuf),
}

impl SnapshotError {
    /// Create an invalid path error.
    pub fn invalid_path(path: impl Into<PathBuf>) -> Self {
        Self::InvalidPath(path.into())
    }
}
