//! CLI integration tests.
//!
//! These tests run the compiled binary against temporary projects.

use srcbundle_test_utils::assertions::{
    assert_file_contains, assert_has_keys, assert_strings_equal, change_entries, object_keys,
};
use srcbundle_test_utils::fixtures::content;
use srcbundle_test_utils::{BuiltTestProject, TestProject};
use std::process::{Command, Output};

/// Path to the srcbundle binary built for this test run.
fn binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_srcbundle")
}

fn run(project: &BuiltTestProject, args: &[&str]) -> Output {
    let output = Command::new(binary_path())
        .args(args)
        .arg("--root")
        .arg(project.path())
        .current_dir(project.path())
        .env_remove("RUST_LOG")
        .env_remove("SRCBUNDLE_CONFIG_CONTENT")
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "srcbundle {:?} failed:\n{}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn sample_project() -> BuiltTestProject {
    TestProject::new()
        .with_package_json("1.0.0")
        .with_file("src/index.ts", content::TS_INDEX)
        .with_file("src/app.ts", content::TS_APP)
        .with_file("src/old.ts", "export const old = 1;\nexport const older = 2;\n")
        .with_file("yarn.lock", "# lock")
        .with_image("assets/logo.png")
        .build()
}

#[test]
fn test_help_command() {
    let output = Command::new(binary_path())
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let help = stdout(&output);
    assert!(help.contains("Versioned source bundles"));
    for command in ["build", "status", "snapshot", "tree"] {
        assert!(help.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_first_build_writes_bundle_and_snapshot() {
    let project = sample_project();

    let output = run(&project, &["build"]);
    assert!(String::from_utf8_lossy(&output.stderr).contains("first snapshot"));

    let bundle = project.read_json("source-bundle.json");
    assert_has_keys(
        &bundle,
        &["generatedAt", "version", "tree", "files", "images", "changes", "stats"],
    );
    assert_eq!(bundle["version"], "1.0.0");
    assert!(bundle["changes"].is_null());
    assert_eq!(
        object_keys(&bundle, "files"),
        vec!["package.json", "src/app.ts", "src/index.ts", "src/old.ts"]
    );
    assert_eq!(object_keys(&bundle, "images"), vec!["assets/logo.png"]);
    assert!(bundle["images"]["assets/logo.png"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
    assert_eq!(bundle["stats"]["totalFiles"], 4);
    assert_eq!(bundle["stats"]["totalImages"], 1);

    assert_file_contains(&project.snapshot_path(), "\"lineCount\"");
    let snapshot = project.read_json(".srcbundle/snapshot.json");
    assert_eq!(snapshot["version"], "1.0.0");
    assert_eq!(snapshot["files"]["src/old.ts"]["lineCount"], 3);
    assert!(snapshot["files"].get("assets/logo.png").is_none());
}

#[test]
fn test_new_version_reports_changes() {
    let project = sample_project();
    run(&project, &["build"]);

    project.bump_package_version("1.1.0");
    project.write_file("src/app.ts", format!("{}// more\n", content::TS_APP));
    project.write_file("src/new.ts", "export {};\n");
    project.delete_file("src/old.ts");
    run(&project, &["build"]);

    let bundle = project.read_json("source-bundle.json");
    assert_eq!(bundle["changes"]["fromVersion"], "1.0.0");
    assert_eq!(bundle["changes"]["toVersion"], "1.1.0");
    assert_eq!(
        change_entries(&bundle),
        vec![
            ("added".to_string(), "src/new.ts".to_string()),
            ("modified".to_string(), "package.json".to_string()),
            ("modified".to_string(), "src/app.ts".to_string()),
            ("deleted".to_string(), "src/old.ts".to_string()),
        ]
    );
    assert_eq!(bundle["changes"]["summary"]["deletedCount"], 1);

    let snapshot = project.read_json(".srcbundle/snapshot.json");
    assert_eq!(snapshot["version"], "1.1.0");
    assert!(snapshot["files"].get("src/old.ts").is_none());
}

#[test]
fn test_same_version_keeps_snapshot() {
    let project = sample_project();
    run(&project, &["build"]);
    let before = project.read_file(".srcbundle/snapshot.json");

    project.write_file("src/app.ts", "changed");
    run(&project, &["build"]);

    let bundle = project.read_json("source-bundle.json");
    assert!(bundle["changes"].is_null());
    assert_eq!(bundle["files"]["src/app.ts"], "changed");
    assert_eq!(project.read_file(".srcbundle/snapshot.json"), before);
}

#[test]
fn test_stdout_and_compact() {
    let project = sample_project();

    let output = run(&project, &["build", "--stdout", "--compact"]);
    let printed = stdout(&output);
    assert_eq!(printed.trim().lines().count(), 1);

    let bundle: serde_json::Value = serde_json::from_str(&printed).unwrap();
    assert_eq!(bundle["version"], "1.0.0");
    assert!(!project.file_exists("source-bundle.json"));
}

#[test]
fn test_version_label_and_output_flags() {
    let project = sample_project();

    run(
        &project,
        &["build", "--version-label", "2024.06", "--output", "out/bundle.json"],
    );

    let bundle = project.read_json("out/bundle.json");
    assert_eq!(bundle["version"], "2024.06");
    assert_eq!(
        project.read_json(".srcbundle/snapshot.json")["version"],
        "2024.06"
    );
}

#[test]
fn test_files_from_list() {
    let project = sample_project();
    project.write_file("list.txt", "src/index.ts\n\n./src/app.ts\nmissing.ts\n");

    let output = run(&project, &["build", "--files-from", "list.txt"]);
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.ts"));

    let bundle = project.read_json("source-bundle.json");
    assert_eq!(
        object_keys(&bundle, "files"),
        vec!["src/app.ts", "src/index.ts"]
    );
}

#[test]
fn test_gitignore_is_respected() {
    let project = TestProject::new()
        .with_package_json("1.0.0")
        .with_gitignore("dist/\n")
        .with_file("dist/out.js", "built")
        .with_file("src/main.ts", "main")
        .build();

    run(&project, &["build"]);

    let files = object_keys(&project.read_json("source-bundle.json"), "files");
    assert!(files.contains(&"src/main.ts".to_string()));
    assert!(!files.iter().any(|f| f.starts_with("dist/")));
}

#[test]
fn test_status_does_not_persist() {
    let project = sample_project();
    run(&project, &["build"]);

    project.write_file("src/new.ts", "export {};\n");
    let output = run(&project, &["status", "--version-label", "1.1.0"]);
    let report = stdout(&output);

    assert!(report.contains("Changes since 1.0.0"));
    assert!(report.contains("src/new.ts"));
    assert_eq!(
        project.read_json(".srcbundle/snapshot.json")["version"],
        "1.0.0"
    );
}

#[test]
fn test_status_without_snapshot() {
    let project = sample_project();

    let report = stdout(&run(&project, &["status"]));
    assert!(report.contains("No changes tracked"));
    assert!(!project.file_exists(".srcbundle/snapshot.json"));
}

#[test]
fn test_snapshot_command() {
    let project = sample_project();

    assert!(stdout(&run(&project, &["snapshot"])).contains("No snapshot"));

    run(&project, &["build"]);
    let report = stdout(&run(&project, &["snapshot"]));
    assert!(report.contains("Version: 1.0.0"));
    assert!(report.contains("Files: 4"));
}

#[test]
fn test_tree_command() {
    let project = sample_project();

    let tree = stdout(&run(&project, &["tree"]));
    assert_strings_equal(
        &tree,
        "assets/\n  logo.png\nsrc/\n  app.ts\n  index.ts\n  old.ts\npackage.json\n\n5 files\n",
    );
}

#[test]
fn test_missing_root_fails() {
    let temp = tempfile::tempdir().expect("Failed to create temp dir");

    let output = Command::new(binary_path())
        .args(["build", "--root"])
        .arg(temp.path().join("does-not-exist"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("enumerate"));
}
