//! Test fixtures and assertions for srcbundle.
//!
//! - **Fixtures**: temporary projects with sources, manifests and config
//! - **Assertions**: helpers for checking bundle JSON and files on disk
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use srcbundle_test_utils::TestProject;
//!
//! let project = TestProject::new()
//!     .with_package_json("1.2.0")
//!     .with_file("src/index.ts", "export {};")
//!     .build();
//!
//! assert!(project.file_exists("package.json"));
//! ```

pub mod assertions;
pub mod fixtures;

pub use fixtures::{BuiltTestProject, TestProject};
