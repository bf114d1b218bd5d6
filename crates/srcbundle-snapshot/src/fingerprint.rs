//! Content fingerprints.
//!
//! A fingerprint identifies a file's content for change detection only; the
//! hash is truncated because it is compared within one project, never used
//! for integrity or secrecy.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the SHA-256 digest.
pub const HASH_LEN: usize = 16;

/// Hash and line count of one file's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub hash: String,
    pub line_count: u64,
}

impl FileRecord {
    /// Fingerprint the given content.
    pub fn of(content: &str) -> Self {
        Self {
            hash: hash(content),
            line_count: line_count(content),
        }
    }
}

/// Short, deterministic content digest.
pub fn hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let mut digest = format!("{:x}", hasher.finalize());
    digest.truncate(HASH_LEN);
    digest
}

/// Number of `\n`-delimited segments.
///
/// A trailing newline produces a final empty segment, so `"a\n"` counts 2 and
/// the empty string counts 1. The change heuristics depend on this.
pub fn line_count(content: &str) -> u64 {
    content.split('\n').count() as u64
}
