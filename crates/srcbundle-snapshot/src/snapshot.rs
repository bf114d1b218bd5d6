//! Snapshot data structures.

use crate::FileRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fingerprints of every tracked text file as of one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Version label of the build that took this snapshot.
    pub version: String,

    /// When the snapshot was taken.
    pub date: DateTime<Utc>,

    /// Project-relative path -> fingerprint.
    pub files: BTreeMap<String, FileRecord>,
}

impl Snapshot {
    /// Create a snapshot from already computed fingerprints.
    pub fn new(version: impl Into<String>, files: BTreeMap<String, FileRecord>) -> Self {
        Self {
            version: version.into(),
            date: Utc::now(),
            files,
        }
    }

    /// Fingerprint the given texts and snapshot them.
    pub fn capture<'a, I>(version: impl Into<String>, texts: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let files = texts
            .into_iter()
            .map(|(path, content)| (path.clone(), FileRecord::of(content)))
            .collect();
        Self::new(version, files)
    }

    /// Look up the fingerprint recorded for a path.
    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.files.get(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Outcome of reading the persisted snapshot.
///
/// A missing file and an unreadable or corrupt file are both `Absent`; callers
/// cannot tell a first run from a damaged store, and don't need to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedSnapshot {
    Loaded(Snapshot),
    Absent,
}

impl LoadedSnapshot {
    pub fn as_snapshot(&self) -> Option<&Snapshot> {
        match self {
            LoadedSnapshot::Loaded(snapshot) => Some(snapshot),
            LoadedSnapshot::Absent => None,
        }
    }

    pub fn into_snapshot(self) -> Option<Snapshot> {
        match self {
            LoadedSnapshot::Loaded(snapshot) => Some(snapshot),
            LoadedSnapshot::Absent => None,
        }
    }

    /// Version label of the stored snapshot, if any.
    pub fn version(&self) -> Option<&str> {
        self.as_snapshot().map(|s| s.version.as_str())
    }

    /// Whether a build labelled `version` must compare and persist.
    ///
    /// True when nothing is stored or the stored label differs. Rebuilding
    /// the same version is a no-op.
    pub fn should_persist(&self, version: &str) -> bool {
        self.version() != Some(version)
    }
}

impl From<Option<Snapshot>> for LoadedSnapshot {
    fn from(value: Option<Snapshot>) -> Self {
        value.map_or(LoadedSnapshot::Absent, LoadedSnapshot::Loaded)
    }
}
