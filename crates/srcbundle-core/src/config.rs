//! Configuration management for srcbundle.
//!
//! Configuration is loaded from two sources and merged:
//! 1. Environment variable: `SRCBUNDLE_CONFIG_CONTENT`
//! 2. Project config: `srcbundle.jsonc` or `srcbundle.json` in the project root
//!
//! Both accept JSONC (JSON with `//` and `/* */` comments). Every field is
//! optional; accessors fall back to the defaults below. Command-line flags are
//! applied on top by the binary.

use crate::error::{ConfigError, CoreResult};
use serde::{Deserialize, Serialize};
use srcbundle_util::path::{project_state_dir, relative_to};
use std::path::{Path, PathBuf};

/// Project config file names, in lookup order.
pub const CONFIG_FILE_NAMES: &[&str] = &["srcbundle.jsonc", "srcbundle.json"];

/// Environment variable holding inline config content.
pub const CONFIG_ENV_VAR: &str = "SRCBUNDLE_CONFIG_CONTENT";

/// Default bundle file, relative to the project root.
pub const DEFAULT_OUTPUT: &str = "source-bundle.json";

/// Paths never bundled: lock files, logs and private files.
pub const DEFAULT_EXCLUDE: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "bun.lockb",
    "Cargo.lock",
    "*.log",
    ".env",
    ".env.*",
    "*.pem",
    "*.key",
];

/// Extensions treated as images (bundled as data URIs, never diffed).
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] =
    &["png", "jpg", "jpeg", "gif", "webp", "ico", "bmp", "svg"];

const DEFAULT_READ_CONCURRENCY: usize = 32;
const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// JSON Schema reference.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Bundle output file (relative to the project root).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Snapshot file (relative to the project root).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<PathBuf>,

    /// Extra denylist patterns, added to the defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,

    /// Extensions bundled as images. Replaces the defaults when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_extensions: Option<Vec<String>>,

    /// Maximum number of files read at once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_concurrency: Option<usize>,

    /// Text files larger than this many bytes are skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,

    /// Pretty-print the bundle JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Returns the merged config and the files it was read from.
    pub async fn load(project_root: &Path) -> CoreResult<(Self, Vec<PathBuf>)> {
        let mut config = Config::default();
        let mut sources = Vec::new();

        if let Ok(content) = std::env::var(CONFIG_ENV_VAR) {
            let loaded = Self::parse_jsonc(&content, "<env>")?;
            config = config.merge(loaded);
        }

        for name in CONFIG_FILE_NAMES {
            let path = project_root.join(name);
            if path.exists() {
                let loaded = Self::load_file(&path).await?;
                config = config.merge(loaded);
                sources.push(path);
                break;
            }
        }

        config.validate()?;
        Ok((config, sources))
    }

    /// Load configuration from a file.
    pub async fn load_file(path: &Path) -> CoreResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse_jsonc(&content, &path.display().to_string())
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(mut self, other: Self) -> Self {
        if other.schema.is_some() {
            self.schema = other.schema;
        }
        if other.output.is_some() {
            self.output = other.output;
        }
        if other.snapshot_path.is_some() {
            self.snapshot_path = other.snapshot_path;
        }
        if let Some(extra) = other.exclude {
            self.exclude.get_or_insert_with(Vec::new).extend(extra);
        }
        if other.image_extensions.is_some() {
            self.image_extensions = other.image_extensions;
        }
        if other.read_concurrency.is_some() {
            self.read_concurrency = other.read_concurrency;
        }
        if other.max_file_size.is_some() {
            self.max_file_size = other.max_file_size;
        }
        if other.pretty.is_some() {
            self.pretty = other.pretty;
        }
        self
    }

    /// Reject values the build cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.read_concurrency == Some(0) {
            return Err(ConfigError::Validation {
                message: "readConcurrency must be at least 1".to_string(),
            });
        }
        if self.output.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::Validation {
                message: "output must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Absolute bundle output path.
    pub fn output_path(&self, project_root: &Path) -> PathBuf {
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        project_root.join(output)
    }

    /// Absolute snapshot file path.
    pub fn snapshot_path(&self, project_root: &Path) -> PathBuf {
        match &self.snapshot_path {
            Some(path) => project_root.join(path),
            None => project_state_dir(project_root).join(srcbundle_snapshot::SNAPSHOT_FILE_NAME),
        }
    }

    /// Full denylist: defaults, configured extras, and the build's own
    /// artifacts (bundle output, snapshot file, state directory).
    pub fn denylist(&self, project_root: &Path) -> Vec<String> {
        let mut patterns: Vec<String> = DEFAULT_EXCLUDE.iter().map(|p| p.to_string()).collect();
        patterns.extend(self.exclude.iter().flatten().cloned());

        for artifact in [self.output_path(project_root), self.snapshot_path(project_root)] {
            if let Some(relative) = relative_to(&artifact, project_root) {
                patterns.push(relative);
            }
        }
        patterns.push(format!("{}/*", srcbundle_util::path::STATE_DIR_NAME));

        patterns
    }

    /// Lower-cased image extensions.
    pub fn image_extensions(&self) -> Vec<String> {
        match &self.image_extensions {
            Some(exts) => exts
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            None => DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }

    /// Files read per batch; never zero.
    pub fn read_concurrency(&self) -> usize {
        self.read_concurrency.unwrap_or(DEFAULT_READ_CONCURRENCY).max(1)
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE)
    }

    pub fn pretty(&self) -> bool {
        self.pretty.unwrap_or(true)
    }

    /// Parse JSONC (JSON with comments).
    fn parse_jsonc(content: &str, source: &str) -> CoreResult<Self> {
        let stripped = strip_comments(content);

        serde_json::from_str(&stripped).map_err(|e| {
            ConfigError::InvalidJson {
                path: source.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

/// Remove `//` and `/* */` comments outside of string literals.
///
/// Newlines inside comments are kept so parse errors report the right line.
fn strip_comments(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                result.push(c);
            }
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    if c == '\n' {
                        result.push('\n');
                    }
                    prev = c;
                }
            }
            _ => result.push(c),
        }
    }

    result
}
