//! File enumeration.
//!
//! Deciding which files belong to a project is the job of a [`FileSource`].
//! [`WalkSource`] walks the project honoring `.gitignore`; [`ListSource`]
//! replays an explicit list, e.g. the output of `git ls-files`.

use crate::error::{CoreError, CoreResult};
use async_trait::async_trait;
use ignore::WalkBuilder;
use srcbundle_util::path::relative_to;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Supplies the project-relative, `/`-separated paths of candidate files.
///
/// An error aborts the build.
#[async_trait]
pub trait FileSource: Send + Sync {
    async fn list_files(&self) -> CoreResult<Vec<String>>;
}

/// Walks the project directory.
///
/// Honors `.gitignore` (even outside a git repository) and skips hidden
/// directories such as `.git/` and the srcbundle state directory. Dotfiles are
/// included; the denylist decides about them.
#[derive(Debug, Clone)]
pub struct WalkSource {
    root: PathBuf,
}

impl WalkSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn walk(root: &Path) -> CoreResult<Vec<String>> {
        let metadata = std::fs::metadata(root)
            .map_err(|e| CoreError::enumeration(root.display(), e.to_string()))?;
        if !metadata.is_dir() {
            return Err(CoreError::enumeration(root.display(), "not a directory"));
        }

        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(true)
            .git_exclude(true)
            .git_global(false)
            .require_git(false)
            .follow_links(false)
            .filter_entry(|entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                !(entry.depth() > 0 && is_dir && is_hidden(entry.file_name()))
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if let Some(relative) = relative_to(entry.path(), root) {
                files.push(relative);
            }
        }

        files.sort();
        debug!(root = %root.display(), count = files.len(), "Enumerated files");
        Ok(files)
    }
}

#[async_trait]
impl FileSource for WalkSource {
    async fn list_files(&self) -> CoreResult<Vec<String>> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || Self::walk(&root))
            .await
            .map_err(|e| CoreError::enumeration(self.root.display(), e.to_string()))?
    }
}

/// A fixed list of paths.
#[derive(Debug, Clone, Default)]
pub struct ListSource {
    paths: Vec<String>,
}

impl ListSource {
    pub fn new(paths: Vec<String>) -> Self {
        Self {
            paths: paths.iter().filter_map(|p| clean(p)).collect(),
        }
    }

    /// One path per line; blank lines are ignored.
    pub fn parse(text: &str) -> Self {
        Self {
            paths: text.lines().filter_map(clean).collect(),
        }
    }

    /// Read a path list from a file.
    pub async fn from_file(path: &Path) -> CoreResult<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CoreError::enumeration(path.display(), e.to_string()))?;
        Ok(Self::parse(&text))
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }
}

#[async_trait]
impl FileSource for ListSource {
    async fn list_files(&self) -> CoreResult<Vec<String>> {
        Ok(self.paths.clone())
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

/// Normalize one listed path to the `a/b/c` form.
///
/// Paths with `..` segments could point outside the project and are dropped.
fn clean(raw: &str) -> Option<String> {
    let path = raw.trim().replace('\\', "/");
    let path = path.trim_start_matches("./");
    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if segments.contains(&"..") {
        warn!(path = %raw.trim(), "Ignoring path outside the project");
        return None;
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
