//! Change detection between the stored snapshot and the current files.
//!
//! Line counts are compared, not lines: `additions`/`deletions` on a modified
//! file are a directional estimate, `|new - old|` split evenly on top of the
//! net growth or shrinkage. A same-length edit reports 0/0.

use crate::{FileRecord, Snapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a path differs from the stored snapshot.
///
/// Variant order is the report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// One changed path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
    pub additions: u64,
    pub deletions: u64,
}

impl FileChange {
    fn added(path: &str, record: &FileRecord) -> Self {
        Self {
            path: path.to_string(),
            kind: ChangeKind::Added,
            additions: record.line_count,
            deletions: 0,
        }
    }

    fn modified(path: &str, old: &FileRecord, new: &FileRecord) -> Self {
        let (old_lines, new_lines) = (old.line_count, new.line_count);
        let half = old_lines.abs_diff(new_lines) / 2;
        Self {
            path: path.to_string(),
            kind: ChangeKind::Modified,
            additions: new_lines.saturating_sub(old_lines) + half,
            deletions: old_lines.saturating_sub(new_lines) + half,
        }
    }

    fn deleted(path: &str, old: &FileRecord) -> Self {
        Self {
            path: path.to_string(),
            kind: ChangeKind::Deleted,
            additions: 0,
            deletions: old.line_count,
        }
    }
}

/// Aggregate counts over a change list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    pub added_count: usize,
    pub modified_count: usize,
    pub deleted_count: usize,
    pub total_additions: u64,
    pub total_deletions: u64,
}

impl ChangeSummary {
    pub fn from_changes(changes: &[FileChange]) -> Self {
        changes.iter().fold(Self::default(), |mut summary, change| {
            match change.kind {
                ChangeKind::Added => summary.added_count += 1,
                ChangeKind::Modified => summary.modified_count += 1,
                ChangeKind::Deleted => summary.deleted_count += 1,
            }
            summary.total_additions += change.additions;
            summary.total_deletions += change.deletions;
            summary
        })
    }

    /// Number of changed paths.
    pub fn total(&self) -> usize {
        self.added_count + self.modified_count + self.deleted_count
    }
}

/// Change report between two versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionChanges {
    /// Version of the stored snapshot.
    pub from_version: Option<String>,
    pub to_version: String,
    pub date: DateTime<Utc>,
    /// Sorted by kind, then path.
    pub changes: Vec<FileChange>,
    pub summary: ChangeSummary,
}

impl VersionChanges {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Compare current fingerprints against the stored snapshot.
///
/// Returns `None` without a stored snapshot: a first run is not reported as
/// every file being added.
pub fn diff_snapshot(
    previous: Option<&Snapshot>,
    current: &BTreeMap<String, FileRecord>,
    to_version: &str,
) -> Option<VersionChanges> {
    let previous = previous?;

    let mut changes: Vec<FileChange> = current
        .iter()
        .filter_map(|(path, record)| match previous.get(path) {
            None => Some(FileChange::added(path, record)),
            Some(old) if old.hash != record.hash => {
                Some(FileChange::modified(path, old, record))
            }
            Some(_) => None,
        })
        .collect();

    changes.extend(
        previous
            .files
            .iter()
            .filter(|(path, _)| !current.contains_key(*path))
            .map(|(path, old)| FileChange::deleted(path, old)),
    );

    changes.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.path.cmp(&b.path)));

    let summary = ChangeSummary::from_changes(&changes);

    Some(VersionChanges {
        from_version: Some(previous.version.clone()),
        to_version: to_version.to_string(),
        date: Utc::now(),
        changes,
        summary,
    })
}

/// Fingerprint `current` texts, then [`diff_snapshot`].
pub fn detect_changes(
    previous: Option<&Snapshot>,
    current: &BTreeMap<String, String>,
    to_version: &str,
) -> Option<VersionChanges> {
    let fingerprints: BTreeMap<String, FileRecord> = current
        .iter()
        .map(|(path, content)| (path.clone(), FileRecord::of(content)))
        .collect();
    diff_snapshot(previous, &fingerprints, to_version)
}
