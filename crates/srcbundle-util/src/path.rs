//! Path utilities.
//!
//! Project-relative paths are carried around as `/`-separated strings so that
//! bundles and snapshots compare equal across platforms.

use std::path::{Component, Path, PathBuf};

/// Name of the per-project state directory.
pub const STATE_DIR_NAME: &str = ".srcbundle";

/// Get the project-local state directory (snapshot file, caches).
pub fn project_state_dir(project_root: &Path) -> PathBuf {
    project_root.join(STATE_DIR_NAME)
}

/// Render a relative path with `/` separators.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Make a path relative to a base directory, `/`-separated.
///
/// Returns `None` if the path is not within the base directory.
pub fn relative_to(path: &Path, base: &Path) -> Option<String> {
    path.strip_prefix(base).ok().map(to_slash)
}

/// Resolve a project-relative `/`-separated path against the project root.
pub fn resolve(project_root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(project_root.to_path_buf(), |acc, seg| acc.join(seg))
}

/// Lower-cased extension of a `/`-separated path, without the dot.
///
/// Dotfiles such as `.gitignore` have no extension.
pub fn extension(path: &str) -> Option<String> {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) if idx + 1 < name.len() => Some(name[idx + 1..].to_ascii_lowercase()),
        Some(_) => None,
    }
}

/// Find the project root by walking up the directory tree.
///
/// Looks for markers like `.srcbundle/`, `.git/`, `Cargo.toml`, `package.json`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let markers = [STATE_DIR_NAME, ".git", "Cargo.toml", "package.json"];

    let mut current = start.to_path_buf();

    loop {
        if markers.iter().any(|m| current.join(m).exists()) {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}
