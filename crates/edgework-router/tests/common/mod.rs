#![allow(dead_code)]

use edgework_router::{Method, Router, RouterTree};

pub type Tree = RouterTree<&'static str>;

pub fn tree(routes: &[(Method, &str, &'static str)]) -> Tree {
    let mut tree = RouterTree::new();
    for &(method, path, handler) in routes {
        tree.register(method, path, handler, false)
            .unwrap_or_else(|e| panic!("Failed to register {method} {path}: {e}"));
    }
    tree
}

pub fn router(routes: &[(&str, &str, &'static str)]) -> Router<&'static str> {
    let mut router = Router::new();
    for &(method, path, handler) in routes {
        router
            .register(method, path, handler, false)
            .unwrap_or_else(|e| panic!("Failed to register {method} {path}: {e}"));
    }
    router
}

pub fn handler(router: &Router<&'static str>, method: &str, path: &str) -> Option<&'static str> {
    router
        .lookup(method, path)
        .unwrap_or_else(|e| panic!("Lookup failed for {method} {path}: {e}"))
        .handler
        .copied()
}
