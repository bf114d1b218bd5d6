//! Core build logic for srcbundle.
//!
//! - Configuration management (multi-source, JSONC support)
//! - File enumeration ([`FileSource`]: directory walk or explicit list)
//! - Version label resolution
//! - Tree building and image encoding
//! - Bundle assembly, including snapshot comparison via `srcbundle-snapshot`

pub mod bundle;
pub mod config;
pub mod error;
pub mod image;
pub mod source;
pub mod tree;
pub mod version;

pub use bundle::{BuildOutcome, BuildWarning, BundleBuilder, BundleStats, SourceBundle};
pub use config::Config;
pub use error::{ConfigError, CoreError, CoreResult};
pub use source::{FileSource, ListSource, WalkSource};
pub use tree::{build_tree, FileNode, NodeKind};
pub use version::{VersionLabel, VersionSource};
