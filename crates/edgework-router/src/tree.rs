//! The routing trie.
//!
//! Every node stands for one path segment. A node may have, at the same time,
//! literal children keyed by their exact text, a single parameter child
//! shared by every `:name` registered at that depth, and regular-expression
//! children kept in registration order. Lookups try them in that priority
//! order and commit to the first child that accepts the segment: a branch
//! that fails deeper down is not retried through a sibling. This keeps a
//! lookup linear in the number of segments.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::error::{Result, RouterError};
use crate::method::Method;
use crate::params::PathParams;
use crate::path::{split, PathSpec, Pattern, Segment};
use crate::route::Route;

/// One node of the routing trie.
#[derive(Debug)]
pub struct RouterNode<H> {
    route: Option<Route<H>>,
    /// Parameter names declared by the registration that ends here, in path
    /// order. Names live with the endpoint rather than on the shared
    /// parameter child, so `/users/:id` and `/users/:user_id/posts` each
    /// capture under their own names.
    labels: Vec<String>,
    literal_index: HashMap<String, usize>,
    literal_children: Vec<(String, RouterNode<H>)>,
    param_child: Option<Box<RouterNode<H>>>,
    regex_children: Vec<(Pattern, RouterNode<H>)>,
}

impl<H> Default for RouterNode<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouterNode<H> {
    fn new() -> Self {
        Self {
            route: None,
            labels: Vec::new(),
            literal_index: HashMap::new(),
            literal_children: Vec::new(),
            param_child: None,
            regex_children: Vec::new(),
        }
    }

    /// Returns the route terminating at this node.
    #[must_use]
    pub const fn route(&self) -> Option<&Route<H>> {
        self.route.as_ref()
    }

    /// Returns the parameter names captured for the route ending here.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the literal child for `segment`.
    #[must_use]
    pub fn literal(&self, segment: &str) -> Option<&Self> {
        self.literal_index
            .get(segment)
            .map(|&i| &self.literal_children[i].1)
    }

    /// Returns the parameter child.
    #[must_use]
    pub fn param(&self) -> Option<&Self> {
        self.param_child.as_deref()
    }

    /// Returns the child registered for `pattern`.
    #[must_use]
    pub fn pattern(&self, pattern: &Pattern) -> Option<&Self> {
        self.regex_children
            .iter()
            .find(|(p, _)| p == pattern)
            .map(|(_, child)| child)
    }

    /// Iterates over literal children in insertion order.
    pub fn literals(&self) -> impl Iterator<Item = (&str, &Self)> {
        self.literal_children
            .iter()
            .map(|(segment, child)| (segment.as_str(), child))
    }

    /// Iterates over regular-expression children in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = (&Pattern, &Self)> {
        self.regex_children.iter().map(|(p, child)| (p, child))
    }

    /// Picks the child accepting `segment`: literal, then parameter, then the
    /// first matching pattern. The flag tells whether the value is captured.
    fn step(&self, segment: &str) -> Option<(&Self, bool)> {
        if let Some(child) = self.literal(segment) {
            return Some((child, false));
        }
        if let Some(child) = self.param() {
            return Some((child, true));
        }
        self.regex_children
            .iter()
            .find(|(p, _)| p.is_match(segment))
            .map(|(_, child)| (child, false))
    }

    fn child_mut(&mut self, segment: &Segment) -> &mut Self {
        match segment {
            Segment::Literal(s) => {
                let index = if let Some(&i) = self.literal_index.get(s) {
                    i
                } else {
                    let i = self.literal_children.len();
                    self.literal_children.push((s.clone(), Self::new()));
                    self.literal_index.insert(s.clone(), i);
                    i
                };
                &mut self.literal_children[index].1
            }
            Segment::Param(_) => &mut **self.param_child.get_or_insert_with(Box::default),
            Segment::Pattern(pattern) => {
                let index = if let Some(i) = self.regex_children.iter().position(|(p, _)| p == pattern) {
                    i
                } else {
                    self.regex_children.push((pattern.clone(), Self::new()));
                    self.regex_children.len() - 1
                };
                &mut self.regex_children[index].1
            }
        }
    }

    fn descend_mut(&mut self, spec: &PathSpec) -> &mut Self {
        let mut node = self;
        for segment in spec.segments() {
            node = node.child_mut(segment);
        }
        node
    }

    fn attach(&mut self, spec: &PathSpec, route: Route<H>) {
        match &mut self.route {
            Some(existing) => existing.update(route),
            None => self.route = Some(route),
        }
        self.labels = spec.param_names().map(str::to_string).collect();
    }
}

/// The outcome of a lookup.
///
/// `handler` is `None` when neither the tree nor the default route answers the
/// request; callers turn that into their own not-found response.
#[derive(Debug)]
pub struct Lookup<'t, H> {
    /// The handler answering the request.
    pub handler: Option<&'t H>,
    /// Parameters captured along the matched path.
    pub params: PathParams,
}

impl<H> Lookup<'_, H> {
    /// Returns whether a handler was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.handler.is_some()
    }
}

/// A routing trie mapping methods and paths to handlers.
///
/// # Example
///
/// ```
/// use edgework_router::{Method, RouterTree};
///
/// let mut tree = RouterTree::new();
/// tree.register(Method::Get, "/users/:id", "user", false).unwrap();
///
/// let lookup = tree.find(Method::Get, "/users/42/");
/// assert_eq!(lookup.handler, Some(&"user"));
/// assert_eq!(lookup.params.get("id"), Some("42"));
/// ```
#[derive(Debug)]
pub struct RouterTree<H> {
    root: RouterNode<H>,
    default_route: Route<H>,
}

impl<H> Default for RouterTree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouterTree<H> {
    /// Creates an empty tree with an empty default route.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default(Route::new())
    }

    /// Creates an empty tree answering unmatched requests with `default_route`.
    #[must_use]
    pub fn with_default(default_route: Route<H>) -> Self {
        Self {
            root: RouterNode::new(),
            default_route,
        }
    }

    /// Returns the root node, standing for `/`.
    #[must_use]
    pub const fn root(&self) -> &RouterNode<H> {
        &self.root
    }

    /// Returns the default route.
    #[must_use]
    pub const fn default_route(&self) -> &Route<H> {
        &self.default_route
    }

    /// Binds `handler` to `method` on the default route.
    pub fn set_default(&mut self, method: Method, handler: H) {
        self.default_route.update(Route::with(method, handler));
    }

    /// Registers `handler` for `method` on `path`.
    ///
    /// Intermediate nodes are created as needed. If a route already ends at
    /// the path its method table is extended, replacing the handler for
    /// `method` when one exists.
    ///
    /// # Errors
    ///
    /// With `strict` set, returns [`RouterError::DuplicateRoute`] when a
    /// request with `method` is already answered on this path, directly or
    /// through `any`. The existing handler stays in place.
    pub fn register(
        &mut self,
        method: Method,
        path: impl Into<PathSpec>,
        handler: H,
        strict: bool,
    ) -> Result<()> {
        let spec = path.into();
        let node = self.root.descend_mut(&spec);

        if strict && node.route.as_ref().is_some_and(|route| route.binds(method)) {
            warn!(%method, path = %spec, "rejected duplicate route");
            return Err(RouterError::DuplicateRoute {
                method: method.to_string(),
                path: spec.to_string(),
            });
        }

        node.attach(&spec, Route::with(method, handler));
        debug!(%method, path = %spec, strict, "registered route");
        Ok(())
    }

    /// Finds the handler for `method` on `path`.
    ///
    /// Segments are matched literal first, then parameter, then regular
    /// expressions in registration order. When the walk fails, or the node it
    /// reaches answers neither `method` nor `any`, the default route is
    /// consulted the same way, with no parameters.
    #[must_use]
    pub fn find(&self, method: Method, path: &str) -> Lookup<'_, H> {
        let mut node = &self.root;
        let mut captured = Vec::new();
        let mut reached = true;

        for segment in split(path) {
            if let Some((next, capture)) = node.step(segment) {
                if capture {
                    captured.push(segment);
                }
                node = next;
            } else {
                reached = false;
                break;
            }
        }

        if reached {
            if let Some(handler) = node.route().and_then(|route| route.resolve(method)) {
                trace!(%method, path, "route matched");
                let params = node
                    .labels
                    .iter()
                    .map(String::as_str)
                    .zip(captured)
                    .collect();
                return Lookup {
                    handler: Some(handler),
                    params,
                };
            }
        }

        let handler = self.default_route.resolve(method);
        trace!(%method, path, fallback = handler.is_some(), "no route matched");
        Lookup {
            handler,
            params: PathParams::new(),
        }
    }

    /// Iterates over every route in the tree with the segments leading to it.
    ///
    /// The walk is depth first. At each node its own route comes first, then
    /// literal children in insertion order, the parameter child as its `:name`
    /// marker, and finally pattern children in registration order.
    #[must_use]
    pub fn entries(&self) -> Entries<'_, H> {
        Entries {
            stack: vec![(&self.root, Vec::new())],
        }
    }

    /// Re-registers every route of `other` under `prefix`.
    ///
    /// Method tables are copied as they are. Where a path already exists here
    /// the tables are merged per method, the incoming handler winning. The
    /// default route of `other` is not copied.
    pub fn merge(&mut self, prefix: impl Into<PathSpec>, other: &Self)
    where
        H: Clone,
    {
        let prefix = prefix.into();
        let mut merged = 0usize;

        for (path, route) in other.entries() {
            let spec = prefix.join(&path);
            self.root.descend_mut(&spec).attach(&spec, route.clone());
            merged += 1;
        }

        debug!(prefix = %prefix, routes = merged, "merged router tree");
    }
}

/// Depth-first iterator over the routes of a [`RouterTree`].
///
/// Created by [`RouterTree::entries`].
pub struct Entries<'t, H> {
    stack: Vec<(&'t RouterNode<H>, Vec<Segment>)>,
}

impl<'t, H> Iterator for Entries<'t, H> {
    type Item = (PathSpec, &'t Route<H>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, path)) = self.stack.pop() {
            // Pushed in reverse so that literals come off the stack first.
            for (pattern, child) in node.regex_children.iter().rev() {
                self.stack
                    .push((child, extend(&path, Segment::Pattern(pattern.clone()))));
            }
            if let Some(child) = node.param() {
                self.stack
                    .push((child, extend(&path, Segment::Param(String::new()))));
            }
            for (segment, child) in node.literal_children.iter().rev() {
                self.stack
                    .push((child, extend(&path, Segment::Literal(segment.clone()))));
            }

            if let Some(route) = node.route().filter(|route| !route.is_empty()) {
                return Some((label(path, &node.labels), route));
            }
        }
        None
    }
}

fn extend(path: &[Segment], segment: Segment) -> Vec<Segment> {
    let mut out = Vec::with_capacity(path.len() + 1);
    out.extend_from_slice(path);
    out.push(segment);
    out
}

/// Names the parameter placeholders of `path` after the endpoint's labels.
fn label(mut path: Vec<Segment>, labels: &[String]) -> PathSpec {
    let mut names = labels.iter();
    for segment in &mut path {
        if let Segment::Param(name) = segment {
            if let Some(label) = names.next() {
                name.clone_from(label);
            }
        }
    }
    PathSpec::from(path)
}
