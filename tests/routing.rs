//! Public routing primitives, exercised the way an application would.

use canopy::{Context, Error, Group, Next, RouteTree, decode_body, join_paths, match_path, parse_query, resolve};
use http::Method;
use serde_json::json;

async fn noop(_ctx: Context) {}

async fn pass(ctx: Context, next: Next) -> Result<(), Error> {
    next.run(ctx).await
}

#[test]
fn literal_match_iff_all_segments_equal() {
    let cases = [
        ("/a/b/c", "/a/b/c", true),
        ("/a/b/c", "/a/x/c", false),
        ("/a/b", "/a/b/c", false),
        ("/a/b/c", "/a/b", false),
        ("/", "/", true),
    ];
    for (pattern, path, expected) in cases {
        assert_eq!(match_path(pattern, path).is_some(), expected, "{pattern} vs {path}");
    }
}

#[test]
fn parameter_binding() {
    let params = match_path("/users/:id", "/users/42").unwrap();
    assert_eq!(params.get("id").map(String::as_str), Some("42"));
    assert!(match_path("/users/:id", "/users").is_none());
}

#[test]
fn path_joining() {
    assert_eq!(join_paths("/api/", "/users/"), "/api/users");
    assert_eq!(join_paths("", ""), "/");
}

#[test]
fn query_parsing() {
    assert_eq!(parse_query("flag")["flag"], "");
    let query = parse_query("foo=bar&baz=qux");
    assert_eq!(query["foo"], "bar");
    assert_eq!(query["baz"], "qux");
}

#[test]
fn body_decoding() {
    assert_eq!(decode_body(b""), None);
    assert_eq!(decode_body(b"hello world"), Some(json!("hello world")));
}

#[test]
fn resolution_prefers_direct_endpoints_of_a_group() {
    let tree = RouteTree::new().group(
        Group::new("/api")
            .group(Group::new("/:section").middleware(pass).get("", noop))
            .get("/health", noop),
    );

    let found = resolve(&tree, &Method::GET, "/api/health").unwrap();
    assert_eq!(found.middleware_len(), 0);
    assert!(found.params().is_empty());

    let found = resolve(&tree, &Method::GET, "/api/users").unwrap();
    assert_eq!(found.middleware_len(), 1);
    assert_eq!(found.params()["section"], "users");
}

#[test]
fn resolution_counts_root_middleware() {
    let tree = RouteTree::new()
        .middleware(pass)
        .get("/", noop)
        .group(Group::new("/v1").middleware(pass).get("/ping", noop));

    assert_eq!(resolve(&tree, &Method::GET, "/").unwrap().middleware_len(), 1);
    assert_eq!(resolve(&tree, &Method::GET, "/v1/ping").unwrap().middleware_len(), 2);
    assert!(resolve(&tree, &Method::GET, "/v2/ping").is_none());
}
