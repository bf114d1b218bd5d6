//! Bundle assembly.
//!
//! A build enumerates the project, reads every eligible file, and packages the
//! tree, contents, images, change report and statistics into a
//! [`SourceBundle`]. Only enumeration failures abort a build; everything else
//! degrades to a [`BuildWarning`].

use crate::config::Config;
use crate::error::CoreResult;
use crate::image;
use crate::source::FileSource;
use crate::tree::{annotate_sizes, build_tree, FileNode};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use srcbundle_snapshot::{diff_snapshot, FileRecord, Snapshot, SnapshotStore, VersionChanges};
use srcbundle_util::path::{extension, resolve};
use srcbundle_util::wildcard::is_denied;
use srcbundle_util::TimingGuard;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extension bucket for files without one.
pub const NO_EXTENSION: &str = "other";

/// The artifact handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceBundle {
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub tree: Vec<FileNode>,
    /// Path -> text content.
    pub files: BTreeMap<String, String>,
    /// Path -> `data:` URI.
    pub images: BTreeMap<String, String>,
    /// `null` on a first run and when the version did not change.
    pub changes: Option<VersionChanges>,
    pub stats: BundleStats,
}

impl SourceBundle {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Write the bundle to `path`, creating parent directories.
    pub async fn write(&self, path: &Path, pretty: bool) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, self.to_json(pretty)?).await?;
        info!(path = %path.display(), "Wrote bundle");
        Ok(())
    }
}

/// Aggregate counts for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleStats {
    pub total_files: usize,
    pub total_images: usize,
    /// Text bytes plus estimated decoded image bytes.
    pub total_size: u64,
    /// Lower-cased extension -> number of files and images.
    pub file_types: BTreeMap<String, usize>,
}

impl BundleStats {
    pub fn compute(files: &BTreeMap<String, String>, images: &BTreeMap<String, String>) -> Self {
        let mut file_types: BTreeMap<String, usize> = BTreeMap::new();
        for path in files.keys().chain(images.keys()) {
            let ext = extension(path).unwrap_or_else(|| NO_EXTENSION.to_string());
            *file_types.entry(ext).or_default() += 1;
        }

        let text_size: u64 = files.values().map(|c| c.len() as u64).sum();
        let image_size: u64 = images.values().map(|uri| image::estimated_size(uri)).sum();

        Self {
            total_files: files.len(),
            total_images: images.len(),
            total_size: text_size + image_size,
            file_types,
        }
    }
}

/// A non-fatal problem encountered during a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// The file could not be read; it is left out of the bundle.
    ReadFailed { path: String, message: String },
    /// The file is not valid UTF-8 and not a known image type.
    NotUtf8 { path: String },
    /// The file exceeds `maxFileSize`.
    TooLarge { path: String, size: u64, limit: u64 },
    /// The bundle is complete but the next build will compare against the
    /// older snapshot.
    SnapshotWriteFailed { message: String },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::ReadFailed { path, message } => {
                write!(f, "skipped {path}: {message}")
            }
            BuildWarning::NotUtf8 { path } => write!(f, "skipped {path}: not valid UTF-8"),
            BuildWarning::TooLarge { path, size, limit } => {
                write!(f, "skipped {path}: {size} bytes exceeds limit of {limit}")
            }
            BuildWarning::SnapshotWriteFailed { message } => {
                write!(f, "snapshot not saved: {message}")
            }
        }
    }
}

/// Result of a build.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub bundle: SourceBundle,
    pub warnings: Vec<BuildWarning>,
    /// Whether the stored snapshot was replaced.
    pub snapshot_written: bool,
    /// Version of the snapshot found before the build.
    pub previous_version: Option<String>,
}

enum ReadResult {
    Text(String, String),
    Image(String, String),
    Skipped(BuildWarning),
}

/// Assembles bundles for one project.
#[derive(Debug, Clone)]
pub struct BundleBuilder {
    root: PathBuf,
    config: Config,
    version: String,
    dry_run: bool,
}

impl BundleBuilder {
    pub fn new(root: impl Into<PathBuf>, config: Config, version: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            config,
            version: version.into(),
            dry_run: false,
        }
    }

    /// Compute changes without replacing the stored snapshot.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Run a build.
    ///
    /// The snapshot is compared and replaced only when its version differs
    /// from this build's version.
    pub async fn build(
        &self,
        source: &dyn FileSource,
        store: &SnapshotStore,
    ) -> CoreResult<BuildOutcome> {
        let _timing = TimingGuard::phase("build");

        let paths = self.eligible_paths(source).await?;
        let (files, images, mut warnings) = self.read_all(paths).await;

        let tree = {
            let _timing = TimingGuard::phase("tree");
            let mut tree = build_tree(&files.keys().chain(images.keys()).collect::<Vec<_>>());
            annotate_sizes(&mut tree, &|path: &str| {
                files
                    .get(path)
                    .map(|content| content.len() as u64)
                    .or_else(|| images.get(path).map(|uri| image::estimated_size(uri)))
            });
            tree
        };

        let loaded = store.load().await;
        let previous_version = loaded.version().map(str::to_string);
        let mut snapshot_written = false;

        let changes = if loaded.should_persist(&self.version) {
            let _timing = TimingGuard::phase("diff");
            let fingerprints: BTreeMap<String, FileRecord> = files
                .iter()
                .map(|(path, content)| (path.clone(), FileRecord::of(content)))
                .collect();
            let changes = diff_snapshot(loaded.as_snapshot(), &fingerprints, &self.version);

            if self.dry_run {
                debug!(version = %self.version, "Dry run, snapshot left untouched");
            } else {
                match store.save(&Snapshot::new(&self.version, fingerprints)).await {
                    Ok(()) => snapshot_written = true,
                    Err(e) => {
                        warn!(
                            path = %store.path().display(),
                            error = %e,
                            "Failed to save snapshot"
                        );
                        warnings.push(BuildWarning::SnapshotWriteFailed {
                            message: e.to_string(),
                        });
                    }
                }
            }
            changes
        } else {
            debug!(version = %self.version, "Version unchanged, skipping comparison");
            None
        };

        let stats = BundleStats::compute(&files, &images);
        info!(
            version = %self.version,
            files = stats.total_files,
            images = stats.total_images,
            changes = changes.as_ref().map_or(0, |c| c.changes.len()),
            warnings = warnings.len(),
            "Assembled bundle"
        );

        Ok(BuildOutcome {
            bundle: SourceBundle {
                generated_at: Utc::now(),
                version: self.version.clone(),
                tree,
                files,
                images,
                changes,
                stats,
            },
            warnings,
            snapshot_written,
            previous_version,
        })
    }

    /// Enumerate, drop denied paths, deduplicate.
    pub async fn eligible_paths(&self, source: &dyn FileSource) -> CoreResult<BTreeSet<String>> {
        let _timing = TimingGuard::phase("enumerate");
        let denylist = self.config.denylist(&self.root);
        let listed = source.list_files().await?;
        let total = listed.len();

        let paths: BTreeSet<String> = listed
            .into_iter()
            .filter(|path| {
                let denied = is_denied(&denylist, path);
                if denied {
                    debug!(path = %path, "Excluded by denylist");
                }
                !denied
            })
            .collect();

        debug!(listed = total, eligible = paths.len(), "Filtered file list");
        Ok(paths)
    }

    /// Read every path concurrently. Results are collected into ordered maps
    /// before anything downstream looks at them.
    async fn read_all(
        &self,
        paths: BTreeSet<String>,
    ) -> (BTreeMap<String, String>, BTreeMap<String, String>, Vec<BuildWarning>) {
        let _timing = TimingGuard::phase("read");
        let image_extensions = self.config.image_extensions();
        let max_file_size = self.config.max_file_size();

        let paths: Vec<String> = paths.into_iter().collect();
        let mut results: Vec<ReadResult> = Vec::with_capacity(paths.len());

        // Each batch is read concurrently; batches run one after another.
        for batch in paths.chunks(self.config.read_concurrency()) {
            let futures: Vec<_> = batch
                .iter()
                .map(|path| {
                    let full_path = resolve(&self.root, path);
                    let is_image =
                        extension(path).is_some_and(|ext| image_extensions.contains(&ext));
                    read_one(path.clone(), full_path, is_image, max_file_size)
                })
                .collect();
            results.extend(join_all(futures).await);
        }

        let mut files = BTreeMap::new();
        let mut images = BTreeMap::new();
        let mut warnings = Vec::new();
        for result in results {
            match result {
                ReadResult::Text(path, content) => {
                    files.insert(path, content);
                }
                ReadResult::Image(path, uri) => {
                    images.insert(path, uri);
                }
                ReadResult::Skipped(warning) => {
                    warn!("{warning}");
                    warnings.push(warning);
                }
            }
        }
        warnings.sort_by(|a, b| a.to_string().cmp(&b.to_string()));

        (files, images, warnings)
    }
}

async fn read_one(
    path: String,
    full_path: PathBuf,
    is_image: bool,
    max_file_size: u64,
) -> ReadResult {
    if !is_image {
        match tokio::fs::metadata(&full_path).await {
            Ok(meta) if meta.len() > max_file_size => {
                return ReadResult::Skipped(BuildWarning::TooLarge {
                    path,
                    size: meta.len(),
                    limit: max_file_size,
                });
            }
            Ok(_) => {}
            Err(e) => {
                return ReadResult::Skipped(BuildWarning::ReadFailed {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    let bytes = match tokio::fs::read(&full_path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return ReadResult::Skipped(BuildWarning::ReadFailed {
                path,
                message: e.to_string(),
            });
        }
    };

    if is_image {
        let ext = extension(&path).unwrap_or_default();
        let uri = image::data_uri(&ext, &bytes);
        return ReadResult::Image(path, uri);
    }

    match String::from_utf8(bytes) {
        Ok(content) => ReadResult::Text(path, content),
        Err(_) => ReadResult::Skipped(BuildWarning::NotUtf8 { path }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ListSource;
    use srcbundle_snapshot::{ChangeKind, LoadedSnapshot};
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
    }

    impl Fixture {
        fn new(files: &[(&str, &[u8])]) -> Self {
            let dir = TempDir::new().unwrap();
            for (path, content) in files {
                let full = dir.path().join(path);
                fs::create_dir_all(full.parent().unwrap()).unwrap();
                fs::write(full, content).unwrap();
            }
            Self { dir }
        }

        fn root(&self) -> &Path {
            self.dir.path()
        }

        fn store(&self) -> SnapshotStore {
            SnapshotStore::new(Config::default().snapshot_path(self.root()))
        }

        fn write(&self, path: &str, content: &str) {
            fs::write(self.root().join(path), content).unwrap();
        }

        async fn build(&self, paths: &[&str], version: &str) -> BuildOutcome {
            let source = ListSource::new(paths.iter().map(|p| p.to_string()).collect());
            BundleBuilder::new(self.root(), Config::default(), version)
                .build(&source, &self.store())
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_first_run_writes_snapshot_without_changes() {
        let fixture = Fixture::new(&[("a.ts", b"1\n2\n3\n4\n5")]);

        let outcome = fixture.build(&["a.ts"], "1.0.0").await;
        assert!(outcome.bundle.changes.is_none());
        assert!(outcome.snapshot_written);
        assert_eq!(outcome.previous_version, None);

        let stored = fixture.store().load().await.into_snapshot().unwrap();
        assert_eq!(stored.version, "1.0.0");
        assert_eq!(
            stored.get("a.ts"),
            Some(&FileRecord::of("1\n2\n3\n4\n5"))
        );
        assert_eq!(stored.get("a.ts").unwrap().line_count, 5);
    }

    #[tokio::test]
    async fn test_same_version_is_noop() {
        let fixture = Fixture::new(&[("a.ts", b"one")]);
        fixture.build(&["a.ts"], "1.0.0").await;
        let before = fixture.store().load().await;

        fixture.write("a.ts", "two");
        let outcome = fixture.build(&["a.ts"], "1.0.0").await;

        assert!(outcome.bundle.changes.is_none());
        assert!(!outcome.snapshot_written);
        assert_eq!(fixture.store().load().await, before);
    }

    #[tokio::test]
    async fn test_new_version_reports_changes() {
        let fixture = Fixture::new(&[("a.ts", b"a\nb"), ("b.ts", b"x\ny\nz")]);
        fixture.build(&["a.ts", "b.ts"], "1.0.0").await;

        fixture.write("a.ts", "a\nb\nc\nd\ne");
        fixture.write("c.ts", "new");
        let outcome = fixture.build(&["a.ts", "c.ts"], "1.1.0").await;

        let changes = outcome.bundle.changes.unwrap();
        assert_eq!(changes.from_version.as_deref(), Some("1.0.0"));
        assert_eq!(changes.to_version, "1.1.0");
        let kinds: Vec<(ChangeKind, &str, u64, u64)> = changes
            .changes
            .iter()
            .map(|c| (c.kind, c.path.as_str(), c.additions, c.deletions))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (ChangeKind::Added, "c.ts", 1, 0),
                (ChangeKind::Modified, "a.ts", 4, 1),
                (ChangeKind::Deleted, "b.ts", 0, 3),
            ]
        );

        let stored = fixture.store().load().await.into_snapshot().unwrap();
        assert_eq!(
            stored.files.keys().collect::<Vec<_>>(),
            vec!["a.ts", "c.ts"]
        );
    }

    #[tokio::test]
    async fn test_unchanged_files_new_version_is_empty_report() {
        let fixture = Fixture::new(&[("a.ts", b"same")]);
        fixture.build(&["a.ts"], "1.0.0").await;

        let outcome = fixture.build(&["a.ts"], "2.0.0").await;
        let changes = outcome.bundle.changes.unwrap();
        assert!(changes.is_empty());
        assert!(outcome.snapshot_written);
    }

    #[tokio::test]
    async fn test_dry_run_leaves_snapshot() {
        let fixture = Fixture::new(&[("a.ts", b"one")]);
        fixture.build(&["a.ts"], "1.0.0").await;

        fixture.write("a.ts", "one\ntwo");
        let source = ListSource::new(vec!["a.ts".to_string()]);
        let outcome = BundleBuilder::new(fixture.root(), Config::default(), "1.1.0")
            .dry_run(true)
            .build(&source, &fixture.store())
            .await
            .unwrap();

        assert_eq!(outcome.bundle.changes.unwrap().changes.len(), 1);
        assert!(!outcome.snapshot_written);
        assert_eq!(fixture.store().load().await.version(), Some("1.0.0"));
    }

    #[tokio::test]
    async fn test_missing_and_binary_files_are_skipped() {
        let fixture = Fixture::new(&[("ok.ts", b"fine"), ("blob.bin", &[0xff, 0xfe, 0x00])]);

        let outcome = fixture.build(&["ok.ts", "blob.bin", "gone.ts"], "1.0.0").await;

        assert_eq!(outcome.bundle.files.keys().collect::<Vec<_>>(), vec!["ok.ts"]);
        assert_eq!(outcome.warnings.len(), 2);
        assert!(outcome
            .warnings
            .contains(&BuildWarning::NotUtf8 { path: "blob.bin".to_string() }));
        assert!(outcome
            .warnings
            .iter()
            .any(|w| matches!(w, BuildWarning::ReadFailed { path, .. } if path == "gone.ts")));

        let stored = fixture.store().load().await.into_snapshot().unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_images_are_bundled_not_fingerprinted() {
        let fixture = Fixture::new(&[("src/app.ts", b"app"), ("assets/logo.png", b"abc")]);

        let outcome = fixture.build(&["src/app.ts", "assets/logo.png"], "1.0.0").await;
        let bundle = &outcome.bundle;

        assert_eq!(bundle.images["assets/logo.png"], "data:image/png;base64,YWJj");
        assert!(!bundle.files.contains_key("assets/logo.png"));
        assert_eq!(bundle.tree[0].name, "assets");
        assert_eq!(bundle.tree[0].children.as_ref().unwrap()[0].size, Some(3));

        let stored = fixture.store().load().await.into_snapshot().unwrap();
        assert!(stored.get("assets/logo.png").is_none());
    }

    #[tokio::test]
    async fn test_denylist_is_applied() {
        let fixture = Fixture::new(&[
            ("src/a.ts", b"a"),
            ("yarn.lock", b"lock"),
            ("logs/debug.log", b"log"),
            ("source-bundle.json", b"{}"),
        ]);

        let outcome = fixture
            .build(&["src/a.ts", "yarn.lock", "logs/debug.log", "source-bundle.json"], "1")
            .await;
        assert_eq!(outcome.bundle.files.keys().collect::<Vec<_>>(), vec!["src/a.ts"]);
        assert!(outcome.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_too_large_is_skipped() {
        let fixture = Fixture::new(&[("big.txt", b"0123456789"), ("small.txt", b"01")]);
        let config = Config {
            max_file_size: Some(5),
            ..Default::default()
        };
        let source = ListSource::new(vec!["big.txt".to_string(), "small.txt".to_string()]);

        let outcome = BundleBuilder::new(fixture.root(), config, "1")
            .build(&source, &fixture.store())
            .await
            .unwrap();

        assert_eq!(
            outcome.warnings,
            vec![BuildWarning::TooLarge {
                path: "big.txt".to_string(),
                size: 10,
                limit: 5,
            }]
        );
        assert!(outcome.bundle.files.contains_key("small.txt"));
    }

    #[tokio::test]
    async fn test_snapshot_write_failure_is_a_warning() {
        let fixture = Fixture::new(&[("a.ts", b"a"), ("blocker", b"file")]);
        let store = SnapshotStore::new(fixture.root().join("blocker/snapshot.json"));
        let source = ListSource::new(vec!["a.ts".to_string()]);

        let outcome = BundleBuilder::new(fixture.root(), Config::default(), "1")
            .build(&source, &store)
            .await
            .unwrap();

        assert!(!outcome.snapshot_written);
        assert!(matches!(
            outcome.warnings.as_slice(),
            [BuildWarning::SnapshotWriteFailed { .. }]
        ));
        assert!(outcome.bundle.files.contains_key("a.ts"));
        assert_eq!(store.load().await, LoadedSnapshot::Absent);
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_reads() {
        let fixture = Fixture::new(&[("a.ts", b"a"), ("b.ts", b"b"), ("c.ts", b"c")]);
        let config = Config {
            read_concurrency: Some(0),
            ..Default::default()
        };
        let source = ListSource::new(vec!["a.ts".into(), "b.ts".into(), "c.ts".into()]);

        let outcome = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            BundleBuilder::new(fixture.root(), config, "1").build(&source, &fixture.store()),
        )
        .await
        .expect("build did not finish")
        .unwrap();

        assert_eq!(outcome.bundle.files.len(), 3);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_treated_as_first_run() {
        let fixture = Fixture::new(&[("a.ts", b"one\ntwo")]);
        let store = fixture.store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        let outcome = fixture.build(&["a.ts"], "2.0.0").await;

        assert!(outcome.bundle.changes.is_none());
        assert!(outcome.snapshot_written);
        assert_eq!(outcome.previous_version, None);
        let stored = store.load().await.into_snapshot().unwrap();
        assert_eq!(stored.version, "2.0.0");
        assert_eq!(stored.get("a.ts").unwrap().line_count, 2);
    }

    #[tokio::test]
    async fn test_stats() {
        let fixture = Fixture::new(&[
            ("a.ts", b"12345"),
            ("b.TS", b"12"),
            ("Makefile", b"all:"),
            ("logo.png", b"abc"),
        ]);

        let outcome = fixture
            .build(&["a.ts", "b.TS", "Makefile", "logo.png"], "1")
            .await;
        let stats = outcome.bundle.stats;

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_images, 1);
        assert_eq!(stats.total_size, 5 + 2 + 4 + 3);
        assert_eq!(stats.file_types["ts"], 2);
        assert_eq!(stats.file_types["png"], 1);
        assert_eq!(stats.file_types[NO_EXTENSION], 1);
    }

    #[tokio::test]
    async fn test_bundle_json_shape() {
        let fixture = Fixture::new(&[("a.ts", b"a")]);
        let outcome = fixture.build(&["a.ts"], "1.0.0").await;
        let json: serde_json::Value =
            serde_json::from_str(&outcome.bundle.to_json(false).unwrap()).unwrap();

        for key in ["generatedAt", "version", "tree", "files", "images", "changes", "stats"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json["changes"].is_null());
        assert_eq!(json["stats"]["totalFiles"], 1);
        assert!(json["stats"]["fileTypes"].is_object());
    }
}
