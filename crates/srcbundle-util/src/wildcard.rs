//! Wildcard pattern matching for path denylists.
//!
//! Patterns use `*` as the only metacharacter; it matches any run of
//! characters, including `/`. A pattern matches a path when it matches either
//! the full project-relative path or just the file name, so `*.log` excludes
//! log files at any depth while `docs/private/*` only excludes that directory.

/// Match a string against a wildcard pattern.
///
/// # Examples
///
/// ```
/// use srcbundle_util::wildcard::matches;
///
/// assert!(matches("*.log", "build.log"));
/// assert!(matches(".env.*", ".env.local"));
/// assert!(!matches("*.log", "build.rs"));
/// ```
pub fn matches(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut pi, mut ti) = (0, 0);
    // Position of the last `*` seen and the text index it was tried against.
    let mut backtrack: Option<(usize, usize)> = None;

    while ti < text.len() {
        if pi < pattern.len() && pattern[pi] == '*' {
            backtrack = Some((pi, ti));
            pi += 1;
        } else if pi < pattern.len() && pattern[pi] == text[ti] {
            pi += 1;
            ti += 1;
        } else if let Some((star, start)) = backtrack {
            pi = star + 1;
            ti = start + 1;
            backtrack = Some((star, start + 1));
        } else {
            return false;
        }
    }

    pattern[pi..].iter().all(|&c| c == '*')
}

/// Return the first pattern that matches `path` or its file name.
pub fn find_matching_pattern<'a, S: AsRef<str>>(patterns: &'a [S], path: &str) -> Option<&'a str> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    patterns
        .iter()
        .map(|p| p.as_ref())
        .find(|p| matches(p, path) || matches(p, file_name))
}

/// Check whether `path` is excluded by any pattern.
pub fn is_denied<S: AsRef<str>>(patterns: &[S], path: &str) -> bool {
    find_matching_pattern(patterns, path).is_some()
}
