//! Property tests for lookup invariants.

mod common;
use common::*;

use edgework_router::{Method, Router, RouterTree};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.~-]{1,12}"
}

fn method() -> impl Strategy<Value = Method> {
    prop::sample::select(vec![
        Method::Get,
        Method::Head,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Options,
        Method::Connect,
        Method::Trace,
    ])
}

proptest! {
    #[test]
    fn registered_literal_path_is_found(
        segments in prop::collection::vec(segment(), 0..6),
        method in method(),
    ) {
        let path = format!("/{}", segments.join("/"));
        let mut tree = RouterTree::new();
        tree.register(method, path.as_str(), "handler", false).unwrap();

        prop_assert_eq!(tree.find(method, &path).handler, Some(&"handler"));
        prop_assert_eq!(tree.find(method, &format!("{path}/")).handler, Some(&"handler"));
    }

    #[test]
    fn any_route_answers_every_method(path in segment(), method in method()) {
        let mut tree = RouterTree::new();
        tree.register(Method::Any, format!("/{path}"), "any", false).unwrap();
        prop_assert_eq!(tree.find(method, &format!("/{path}")).handler, Some(&"any"));
    }

    #[test]
    fn param_captures_any_value(value in segment()) {
        let router = router(&[("get", "/plep/:id", "plep")]);
        let lookup = router.lookup("GET", &format!("/plep/{value}")).unwrap();
        prop_assert_eq!(lookup.handler, Some(&"plep"));
        prop_assert_eq!(lookup.params.get("id"), Some(value.as_str()));
    }

    #[test]
    fn every_param_keeps_its_name(values in prop::collection::vec(segment(), 1..6)) {
        let pattern: String = (0..values.len()).map(|i| format!("/:p{i}")).collect();
        let path: String = values.iter().map(|v| format!("/{v}")).collect();

        let mut tree = RouterTree::new();
        tree.register(Method::Get, pattern, "deep", false).unwrap();

        let lookup = tree.find(Method::Get, &path);
        prop_assert_eq!(lookup.handler, Some(&"deep"));
        prop_assert_eq!(lookup.params.len(), values.len());
        for (i, value) in values.iter().enumerate() {
            prop_assert_eq!(lookup.params.get(&format!("p{i}")), Some(value.as_str()));
        }
    }

    #[test]
    fn second_registration_wins(path in segment(), method in method()) {
        let mut router = Router::new();
        router.register(method.as_str(), format!("/{path}"), "first", false).unwrap();
        router.register(method.as_str(), format!("/{path}"), "second", false).unwrap();
        prop_assert_eq!(router.find(method, &format!("/{path}")).handler, Some(&"second"));

        let third_path = format!("/{path}");
        prop_assert!(router.register(method.as_str(), third_path, "third", true).is_err());
        prop_assert_eq!(router.find(method, &format!("/{path}")).handler, Some(&"second"));
    }
}
