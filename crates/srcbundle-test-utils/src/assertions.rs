//! Assertion helpers for bundle output.

use serde_json::Value;
use std::path::Path;

/// Assert that a file contains specific text.
pub fn assert_file_contains(path: &Path, expected: &str) {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));

    assert!(
        content.contains(expected),
        "File {} does not contain expected text.\nExpected to find: {}\nActual content:\n{}",
        path.display(),
        expected,
        content
    );
}

/// Assert that two strings are equal, with a line diff on failure.
pub fn assert_strings_equal(actual: &str, expected: &str) {
    if actual != expected {
        let diff = similar::TextDiff::from_lines(expected, actual);
        let mut output = String::new();

        for change in diff.iter_all_changes() {
            let sign = match change.tag() {
                similar::ChangeTag::Delete => "-",
                similar::ChangeTag::Insert => "+",
                similar::ChangeTag::Equal => " ",
            };
            output.push_str(&format!("{}{}", sign, change));
        }

        panic!("Strings are not equal.\nDiff:\n{}", output);
    }
}

/// Assert that `value` is an object with every key in `keys`.
pub fn assert_has_keys(value: &Value, keys: &[&str]) {
    let object = value
        .as_object()
        .unwrap_or_else(|| panic!("Expected a JSON object, got: {value}"));
    for key in keys {
        assert!(
            object.contains_key(*key),
            "Missing key {key:?}. Present: {:?}",
            object.keys().collect::<Vec<_>>()
        );
    }
}

/// Sorted keys of the object at `value[field]`.
pub fn object_keys(value: &Value, field: &str) -> Vec<String> {
    value[field]
        .as_object()
        .unwrap_or_else(|| panic!("Field {field:?} is not an object: {}", value[field]))
        .keys()
        .cloned()
        .collect()
}

/// `(kind, path)` pairs from a bundle's `changes.changes` list.
pub fn change_entries(bundle: &Value) -> Vec<(String, String)> {
    bundle["changes"]["changes"]
        .as_array()
        .unwrap_or_else(|| panic!("Bundle has no change list: {}", bundle["changes"]))
        .iter()
        .map(|change| {
            (
                change["kind"].as_str().unwrap_or_default().to_string(),
                change["path"].as_str().unwrap_or_default().to_string(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_assert_file_contains() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.txt");
        fs::write(&path, "Hello, world!").unwrap();

        assert_file_contains(&path, "Hello");
    }

    #[test]
    fn test_assert_strings_equal() {
        assert_strings_equal("a\nb", "a\nb");
    }

    #[test]
    #[should_panic(expected = "Missing key")]
    fn test_assert_has_keys_missing() {
        assert_has_keys(&json!({"files": {}}), &["files", "images"]);
    }

    #[test]
    fn test_object_keys_sorted() {
        let bundle = json!({"files": {"b.ts": "", "a.ts": ""}});
        assert_eq!(object_keys(&bundle, "files"), vec!["a.ts", "b.ts"]);
    }

    #[test]
    fn test_change_entries() {
        let bundle = json!({
            "changes": {"changes": [
                {"path": "new.ts", "kind": "added"},
                {"path": "old.ts", "kind": "deleted"}
            ]}
        });
        assert_eq!(
            change_entries(&bundle),
            vec![
                ("added".to_string(), "new.ts".to_string()),
                ("deleted".to_string(), "old.ts".to_string())
            ]
        );
    }
}
