//! Segment-wise path matching.
//!
//! Patterns and paths are both split on `/` with empty segments dropped, so
//! `/a/`, `/a` and `a` are the same path. A pattern segment starting with `:`
//! captures whatever sits at that position in the request path; every other
//! segment must be byte-for-byte equal. No wildcards, no regex, no
//! backtracking: one linear pass decides the match.

use std::collections::HashMap;

/// Path parameters captured by a match, keyed by name (sigil stripped).
pub type Params = HashMap<String, String>;

const PARAM_SIGIL: char = ':';

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Matches one route `pattern` against one request `path`.
///
/// Returns the captured parameters on success, `None` otherwise.
///
/// ```rust
/// use canopy::match_path;
///
/// let params = match_path("/users/:id", "/users/42").unwrap();
/// assert_eq!(params["id"], "42");
///
/// assert!(match_path("/users/:id", "/users").is_none());
/// ```
///
/// If the same parameter name appears twice in one pattern, the later
/// segment's value wins.
pub fn match_path(pattern: &str, path: &str) -> Option<Params> {
    let pattern: Vec<&str> = segments(pattern).collect();
    let path: Vec<&str> = segments(path).collect();

    if pattern.len() != path.len() {
        return None;
    }

    let mut params = Params::new();
    for (expected, actual) in pattern.iter().zip(&path) {
        match expected.strip_prefix(PARAM_SIGIL) {
            Some(name) => {
                params.insert(name.to_owned(), (*actual).to_owned());
            }
            None if expected == actual => {}
            None => return None,
        }
    }
    Some(params)
}

/// Joins a prefix and a suffix into one normalized path.
///
/// The result always starts with `/` and never ends with one, except for the
/// root itself: `join_paths("/api/", "/users/")` is `"/api/users"` and
/// `join_paths("", "")` is `"/"`.
pub fn join_paths(prefix: &str, suffix: &str) -> String {
    let mut joined = String::with_capacity(prefix.len() + suffix.len() + 1);
    for segment in segments(prefix).chain(segments(suffix)) {
        joined.push('/');
        joined.push_str(segment);
    }
    if joined.is_empty() {
        joined.push('/');
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_patterns_match_equal_paths() {
        assert_eq!(match_path("/a/b", "/a/b"), Some(Params::new()));
        assert!(match_path("/a/b", "/a/c").is_none());
    }

    #[test]
    fn literal_segments_are_case_sensitive() {
        assert!(match_path("/Users", "/users").is_none());
    }

    #[test]
    fn captures_named_parameter() {
        let params = match_path("/users/:id", "/users/42").unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn length_mismatch_never_matches() {
        assert!(match_path("/users/:id", "/users").is_none());
        assert!(match_path("/users", "/users/42").is_none());
        assert!(match_path("/:a", "/").is_none());
    }

    #[test]
    fn empty_segments_are_ignored() {
        assert!(match_path("/a/", "a").is_some());
        assert!(match_path("a", "//a//").is_some());
    }

    #[test]
    fn root_matches_root() {
        assert_eq!(match_path("/", "/"), Some(Params::new()));
        assert_eq!(match_path("", "/"), Some(Params::new()));
    }

    #[test]
    fn repeated_parameter_name_keeps_last_value() {
        let params = match_path("/:x/:x", "/first/second").unwrap();
        assert_eq!(params["x"], "second");
    }

    #[test]
    fn parameter_values_are_not_coerced() {
        let params = match_path("/files/:name", "/files/report%20final.pdf").unwrap();
        assert_eq!(params["name"], "report%20final.pdf");
    }

    #[test]
    fn joins_prefix_and_suffix() {
        assert_eq!(join_paths("/api/", "/users/"), "/api/users");
        assert_eq!(join_paths("/api", ""), "/api");
        assert_eq!(join_paths("", "health"), "/health");
        assert_eq!(join_paths("", ""), "/");
        assert_eq!(join_paths("/", "/"), "/");
    }
}
