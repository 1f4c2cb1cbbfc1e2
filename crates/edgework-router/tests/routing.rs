//! End-to-end routing behaviour through the public API.

mod common;
use common::*;

use edgework_router::{Method, PathSpec, Router, RouterError, Segment};

#[test]
fn registered_handler_is_found() {
    let router = router(&[
        ("get", "/users", "list"),
        ("post", "/users", "create"),
        ("delete", "/users/:id", "destroy"),
    ]);

    assert_eq!(handler(&router, "GET", "/users"), Some("list"));
    assert_eq!(handler(&router, "POST", "/users"), Some("create"));
    assert_eq!(handler(&router, "DELETE", "/users/3"), Some("destroy"));
    assert_eq!(handler(&router, "PUT", "/users"), None);
}

#[test]
fn any_answers_every_method() {
    let router = router(&[("any", "/ping", "pong")]);
    for method in Method::ALLOWED {
        assert_eq!(handler(&router, method, "/ping"), Some("pong"), "{method}");
    }
}

#[test]
fn specific_method_beats_any() {
    let router = router(&[("any", "/ping", "pong"), ("head", "/ping", "head")]);
    assert_eq!(handler(&router, "HEAD", "/ping"), Some("head"));
    assert_eq!(handler(&router, "GET", "/ping"), Some("pong"));
}

#[test]
fn reregistration_replaces_unless_strict() {
    let mut router = router(&[("get", "/a", "first")]);
    router.register("get", "/a", "second", false).unwrap();
    assert_eq!(handler(&router, "GET", "/a"), Some("second"));

    let err = router.register("get", "/a", "third", true).unwrap_err();
    assert_eq!(
        err,
        RouterError::DuplicateRoute {
            method: "get".to_string(),
            path: "/a".to_string(),
        }
    );
    assert_eq!(handler(&router, "GET", "/a"), Some("second"));
}

#[test]
fn trailing_and_empty_paths() {
    let router = router(&[("get", "/", "root"), ("get", "/a/b", "ab")]);
    assert_eq!(handler(&router, "GET", ""), Some("root"));
    assert_eq!(handler(&router, "GET", "/"), Some("root"));
    assert_eq!(handler(&router, "GET", "/a/b"), Some("ab"));
    assert_eq!(handler(&router, "GET", "/a/b/"), Some("ab"));
}

#[test]
fn pattern_segment_between_literals() {
    let router = Router::new()
        .get(
            vec![
                Segment::from("archive"),
                Segment::pattern("[0-9]{4}").unwrap(),
                Segment::from("posts/:slug"),
            ],
            "archive",
        )
        .unwrap();

    let lookup = router.lookup("GET", "/archive/2023/posts/hello").unwrap();
    assert_eq!(lookup.handler, Some(&"archive"));
    assert_eq!(lookup.params.get("slug"), Some("hello"));
    assert_eq!(lookup.params.len(), 1);

    assert_eq!(handler(&router, "GET", "/archive/23/posts/hello"), None);
}

#[test]
fn pattern_miss_falls_back_to_default() {
    let router = Router::new()
        .get(Segment::pattern("[0-9]+").map(|s| vec![s]).unwrap(), "numeric")
        .unwrap()
        .default_handler("fallback");

    assert_eq!(handler(&router, "GET", "/42"), Some("numeric"));
    assert_eq!(handler(&router, "GET", "/abc"), Some("fallback"));
}

#[test]
fn default_route_respects_method() {
    let router = Router::new()
        .any("/plep/plop", "cb")
        .unwrap()
        .default_for(Method::Post, "fallback");

    assert_eq!(handler(&router, "GET", "/plep/plip"), None);
    assert_eq!(handler(&router, "POST", "/plep/plip"), Some("fallback"));
}

#[test]
fn mount_prefixes_entries() {
    let users = router(&[("get", "/users/:id", "show")]);
    let app = Router::new().mount("/api", &users);

    let entries: Vec<_> = app.entries().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].0, PathSpec::from("/api/users/:id"));
    assert_eq!(entries[0].1.get(Method::Get), Some(&"show"));
}

#[test]
fn entries_list_shorter_path_first() {
    let tree = tree(&[
        (Method::Get, "/a/b/c", "long"),
        (Method::Get, "/a/b", "short"),
    ]);

    let entries: Vec<_> = tree.entries().collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].0.len(), 2);
    assert_eq!(entries[1].0.len(), 3);
}

#[test]
fn entries_are_reproducible_through_merge() {
    let source = tree(&[
        (Method::Get, "/x", "x"),
        (Method::Get, "/x/:id", "x_id"),
        (Method::Post, "/y", "y"),
    ]);

    let mut first = tree(&[]);
    first.merge("/m", &source);
    let mut second = tree(&[]);
    second.merge("/m", &source);

    let paths = |t: &Tree| t.entries().map(|(p, _)| p.to_string()).collect::<Vec<_>>();
    assert_eq!(paths(&first), paths(&second));
    assert_eq!(paths(&first), vec!["/m/x", "/m/x/:id", "/m/y"]);
}

#[test]
fn unknown_method_is_rejected() {
    let mut router = Router::<&str>::new();
    assert!(matches!(
        router.register("chicken", "/", "cb", false),
        Err(RouterError::UnknownMethod(_))
    ));
    assert!(matches!(
        router.lookup("chicken", "/"),
        Err(RouterError::UnknownMethod(_))
    ));
}
