//! File tree construction.
//!
//! Builds the display hierarchy for a flat list of `/`-separated paths. The
//! tree is a view recomputed on every build; it is never persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a node is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    // Variant order puts directories first when sorting.
    Directory,
    File,
}

/// One node of the file tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    /// Full project-relative path.
    pub path: String,
    pub kind: NodeKind,
    /// Size in bytes; set on files once annotated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Present on directories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File,
            size: None,
            children: None,
        }
    }

    pub fn directory(
        name: impl Into<String>,
        path: impl Into<String>,
        children: Vec<FileNode>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory,
            size: None,
            children: Some(children),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// Directory under construction. Children are keyed by name, so a directory
/// reached through several files is created once.
#[derive(Default)]
struct DirBuilder {
    dirs: BTreeMap<String, DirBuilder>,
    files: BTreeMap<String, String>,
}

impl DirBuilder {
    fn insert(&mut self, segments: &[&str], path: &str) {
        match segments {
            [] => {}
            [name] => {
                self.files.insert(name.to_string(), path.to_string());
            }
            [dir, rest @ ..] => self
                .dirs
                .entry(dir.to_string())
                .or_default()
                .insert(rest, path),
        }
    }

    fn into_nodes(self, prefix: &str) -> Vec<FileNode> {
        let mut nodes: Vec<FileNode> = self
            .dirs
            .into_iter()
            .map(|(name, dir)| {
                let path = join(prefix, &name);
                let children = dir.into_nodes(&path);
                FileNode::directory(name, path, children)
            })
            .chain(
                self.files
                    .into_iter()
                    .map(|(name, path)| FileNode::file(name, path)),
            )
            .collect();
        sort_nodes(&mut nodes);
        nodes
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Directories before files, then by name.
fn sort_nodes(nodes: &mut [FileNode]) {
    nodes.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
}

/// Build the root-level nodes for the given paths.
///
/// The result only depends on the set of paths, not their order. Empty
/// segments are ignored, and a name used both as a file and as a directory
/// yields one node of each kind.
pub fn build_tree<S: AsRef<str>>(paths: &[S]) -> Vec<FileNode> {
    let mut sorted: Vec<&str> = paths.iter().map(|p| p.as_ref()).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut root = DirBuilder::default();
    for path in sorted {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let normalized = segments.join("/");
        root.insert(&segments, &normalized);
    }

    root.into_nodes("")
}

/// Set `size` on every file node from `lookup(path)`.
pub fn annotate_sizes<F>(nodes: &mut [FileNode], lookup: &F)
where
    F: Fn(&str) -> Option<u64>,
{
    for node in nodes {
        match node.kind {
            NodeKind::File => node.size = lookup(&node.path),
            NodeKind::Directory => {
                if let Some(children) = node.children.as_mut() {
                    annotate_sizes(children, lookup);
                }
            }
        }
    }
}

/// Number of file nodes in the tree.
pub fn count_files(nodes: &[FileNode]) -> usize {
    nodes
        .iter()
        .map(|n| match &n.children {
            Some(children) => count_files(children),
            None => usize::from(n.kind == NodeKind::File),
        })
        .sum()
}

/// Render the tree as indented text, directories suffixed with `/`.
pub fn render(nodes: &[FileNode]) -> String {
    fn walk(nodes: &[FileNode], depth: usize, out: &mut String) {
        for node in nodes {
            out.push_str(&"  ".repeat(depth));
            out.push_str(&node.name);
            if node.is_dir() {
                out.push('/');
            }
            out.push('\n');
            if let Some(children) = &node.children {
                walk(children, depth + 1, out);
            }
        }
    }

    let mut out = String::new();
    walk(nodes, 0, &mut out);
    out
}
