//! Temporary project fixtures.
//!
//! A [`TestProject`] collects files, then [`TestProject::build`] writes them
//! into a fresh temporary directory that is removed on drop.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builder for a temporary project.
///
/// # Example
///
/// ```rust
/// use srcbundle_test_utils::fixtures::TestProject;
///
/// let project = TestProject::new()
///     .with_file("src/main.ts", "console.log(1);")
///     .with_image("assets/logo.png")
///     .build();
///
/// assert!(project.file_exists("assets/logo.png"));
/// ```
pub struct TestProject {
    temp_dir: TempDir,
    /// Relative path -> raw bytes.
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
            files: BTreeMap::new(),
        }
    }

    /// Add a text file. Parent directories are created on build.
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.with_bytes(path, contents.into().into_bytes())
    }

    /// Add a file with arbitrary bytes.
    pub fn with_bytes(mut self, path: impl AsRef<Path>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.as_ref().to_path_buf(), bytes.into());
        self
    }

    /// Add a small PNG file.
    pub fn with_image(self, path: impl AsRef<Path>) -> Self {
        self.with_bytes(path, content::PNG_PIXEL.to_vec())
    }

    /// Add a `package.json` declaring `version`.
    pub fn with_package_json(self, version: &str) -> Self {
        self.with_file("package.json", content::package_json("fixture", version))
    }

    /// Add a `Cargo.toml` declaring `version`.
    pub fn with_cargo_toml(self, version: &str) -> Self {
        self.with_file("Cargo.toml", content::cargo_toml("fixture", version))
    }

    /// Add a `srcbundle.json` config file.
    pub fn with_config(self, config: &str) -> Self {
        self.with_file("srcbundle.json", config)
    }

    pub fn with_gitignore(self, contents: &str) -> Self {
        self.with_file(".gitignore", contents)
    }

    /// Write everything to disk.
    pub fn build(self) -> BuiltTestProject {
        let root = self.temp_dir.path();

        for (path, contents) in &self.files {
            let full_path = root.join(path);
            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent).unwrap_or_else(|e| {
                    panic!("Failed to create parent directory for {}: {}", full_path.display(), e)
                });
            }
            fs::write(&full_path, contents)
                .unwrap_or_else(|e| panic!("Failed to write file {}: {}", full_path.display(), e));
        }

        BuiltTestProject {
            temp_dir: self.temp_dir,
        }
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// A project written to disk.
pub struct BuiltTestProject {
    temp_dir: TempDir,
}

impl BuiltTestProject {
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn read_file(&self, path: impl AsRef<Path>) -> String {
        let full_path = self.path().join(path.as_ref());
        fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("Failed to read file {}: {}", full_path.display(), e))
    }

    /// Read and parse a JSON file, such as a bundle or the snapshot.
    pub fn read_json(&self, path: impl AsRef<Path>) -> serde_json::Value {
        let content = self.read_file(path.as_ref());
        serde_json::from_str(&content)
            .unwrap_or_else(|e| panic!("Invalid JSON in {}: {}", path.as_ref().display(), e))
    }

    pub fn file_exists(&self, path: impl AsRef<Path>) -> bool {
        self.path().join(path.as_ref()).exists()
    }

    /// Overwrite or create a file between builds.
    pub fn write_file(&self, path: impl AsRef<Path>, contents: impl AsRef<str>) {
        let full_path = self.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).ok();
        }
        fs::write(&full_path, contents.as_ref())
            .unwrap_or_else(|e| panic!("Failed to write file {}: {}", full_path.display(), e));
    }

    pub fn delete_file(&self, path: impl AsRef<Path>) {
        let full_path = self.path().join(path.as_ref());
        fs::remove_file(&full_path)
            .unwrap_or_else(|e| panic!("Failed to delete file {}: {}", full_path.display(), e));
    }

    /// Rewrite the `package.json` version.
    pub fn bump_package_version(&self, version: &str) {
        self.write_file("package.json", content::package_json("fixture", version));
    }

    /// Default snapshot location.
    pub fn snapshot_path(&self) -> PathBuf {
        self.path().join(".srcbundle").join("snapshot.json")
    }
}

/// Common file contents.
pub mod content {
    /// A 1x1 transparent PNG.
    pub const PNG_PIXEL: &[u8] = &[
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
        0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
    ];

    /// Bytes that are not valid UTF-8.
    pub const NOT_UTF8: &[u8] = &[0xff, 0xfe, 0xfd, 0x00];

    pub const TS_INDEX: &str = "import { app } from './app';\n\napp.start();\n";

    pub const TS_APP: &str =
        "export const app = {\n  start() {\n    console.log('started');\n  },\n};\n";

    pub fn package_json(name: &str, version: &str) -> String {
        format!(
            r#"{{
  "name": "{name}",
  "version": "{version}"
}}
"#
        )
    }

    pub fn cargo_toml(name: &str, version: &str) -> String {
        format!(
            r#"[package]
name = "{name}"
version = "{version}"
edition = "2021"
"#
        )
    }
}
