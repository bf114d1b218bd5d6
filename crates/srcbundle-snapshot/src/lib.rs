//! Content fingerprints, the persisted snapshot and change detection.
//!
//! A build fingerprints every tracked text file, compares the result against
//! the single stored [`Snapshot`] and, when the version label moved on,
//! replaces the stored snapshot.
//!
//! # Example
//!
//! ```no_run
//! use srcbundle_snapshot::{detect_changes, Snapshot, SnapshotStore};
//! use std::collections::BTreeMap;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SnapshotStore::new(".srcbundle/snapshot.json");
//! let mut files = BTreeMap::new();
//! files.insert("src/main.rs".to_string(), "fn main() {}\n".to_string());
//!
//! let loaded = store.load().await;
//! if loaded.should_persist("1.2.0") {
//!     let report = detect_changes(loaded.as_snapshot(), &files, "1.2.0");
//!     println!("{report:?}");
//!     store.save(&Snapshot::capture("1.2.0", &files)).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod changes;
mod error;
mod fingerprint;
mod snapshot;
mod store;

pub use changes::{
    detect_changes, diff_snapshot, ChangeKind, ChangeSummary, FileChange, VersionChanges,
};
pub use error::{SnapshotError, SnapshotResult};
pub use fingerprint::{hash, line_count, FileRecord, HASH_LEN};
pub use snapshot::{LoadedSnapshot, Snapshot};
pub use store::{SnapshotStore, SNAPSHOT_FILE_NAME};
