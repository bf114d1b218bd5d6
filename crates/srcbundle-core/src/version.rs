//! Version label resolution.
//!
//! The label is an opaque string: it is only compared for equality with the
//! label of the stored snapshot, never parsed or ordered.

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Label used when no manifest declares a version.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Where a version label came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSource {
    /// Passed explicitly (e.g. `--version-label`).
    Explicit,
    /// `version` field of `package.json`.
    PackageJson,
    /// `[package]` or `[workspace.package]` version in `Cargo.toml`.
    CargoToml,
    /// Nothing found; [`DEFAULT_VERSION`].
    Default,
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VersionSource::Explicit => "explicit",
            VersionSource::PackageJson => "package.json",
            VersionSource::CargoToml => "Cargo.toml",
            VersionSource::Default => "default",
        };
        f.write_str(s)
    }
}

/// A resolved version label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLabel {
    pub label: String,
    pub source: VersionSource,
}

impl VersionLabel {
    pub fn explicit(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source: VersionSource::Explicit,
        }
    }

    /// Resolve the label from the project manifests.
    ///
    /// Checks `package.json`, then `Cargo.toml`. Unreadable or malformed
    /// manifests are skipped.
    pub async fn resolve(project_root: &Path) -> Self {
        if let Some(label) = read_package_json(project_root).await {
            return Self {
                label,
                source: VersionSource::PackageJson,
            };
        }
        if let Some(label) = read_cargo_toml(project_root).await {
            return Self {
                label,
                source: VersionSource::CargoToml,
            };
        }
        Self {
            label: DEFAULT_VERSION.to_string(),
            source: VersionSource::Default,
        }
    }
}

impl fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[derive(Deserialize)]
struct PackageJson {
    version: Option<String>,
}

#[derive(Deserialize)]
struct CargoManifest {
    package: Option<CargoPackage>,
    workspace: Option<CargoWorkspace>,
}

#[derive(Deserialize)]
struct CargoWorkspace {
    package: Option<CargoPackage>,
}

#[derive(Deserialize)]
struct CargoPackage {
    // `version.workspace = true` is a table, hence untyped.
    version: Option<toml::Value>,
}

async fn read_package_json(project_root: &Path) -> Option<String> {
    let path = project_root.join("package.json");
    let content = tokio::fs::read_to_string(&path).await.ok()?;
    match serde_json::from_str::<PackageJson>(&content) {
        Ok(manifest) => non_empty(manifest.version),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Skipping malformed package.json");
            None
        }
    }
}

async fn read_cargo_toml(project_root: &Path) -> Option<String> {
    let path = project_root.join("Cargo.toml");
    let content = tokio::fs::read_to_string(&path).await.ok()?;
    let manifest: CargoManifest = match toml::from_str(&content) {
        Ok(manifest) => manifest,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Skipping malformed Cargo.toml");
            return None;
        }
    };

    let as_label = |package: Option<CargoPackage>| {
        package
            .and_then(|p| p.version)
            .and_then(|v| v.as_str().map(str::to_string))
    };

    non_empty(as_label(manifest.package))
        .or_else(|| non_empty(as_label(manifest.workspace.and_then(|w| w.package))))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
