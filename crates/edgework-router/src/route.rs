//! Per-path method tables.

use std::collections::BTreeMap;

use crate::method::Method;

/// The handlers bound to a single path, keyed by HTTP method.
///
/// A method maps to at most one handler. Binding a method again replaces the
/// previous handler; strict registration is enforced by
/// [`RouterTree`](crate::RouterTree) before it reaches the route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route<H> {
    methods: BTreeMap<Method, H>,
}

impl<H> Default for Route<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Route<H> {
    /// Creates a route with no bound methods.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            methods: BTreeMap::new(),
        }
    }

    /// Creates a route with a single bound method.
    #[must_use]
    pub fn with(method: Method, handler: H) -> Self {
        let mut route = Self::new();
        route.set(method, handler);
        route
    }

    /// Binds `handler` to `method`, returning the handler it replaced.
    pub fn set(&mut self, method: Method, handler: H) -> Option<H> {
        self.methods.insert(method, handler)
    }

    /// Returns the handler bound to exactly `method`.
    #[must_use]
    pub fn get(&self, method: Method) -> Option<&H> {
        self.methods.get(&method)
    }

    /// Returns the handler answering `method`, falling back to `any`.
    #[must_use]
    pub fn resolve(&self, method: Method) -> Option<&H> {
        self.get(method).or_else(|| self.get(Method::Any))
    }

    /// Returns whether a request with `method` would already be answered,
    /// either by its own handler or by the `any` wildcard.
    #[must_use]
    pub fn binds(&self, method: Method) -> bool {
        self.resolve(method).is_some()
    }

    /// Merges another route's method table into this one.
    ///
    /// Every method present in `other` overwrites the handler bound here;
    /// methods only bound here are kept.
    pub fn update(&mut self, other: Self) {
        self.methods.extend(other.methods);
    }

    /// Iterates over bound methods and their handlers.
    pub fn methods(&self) -> impl Iterator<Item = (Method, &H)> {
        self.methods.iter().map(|(method, handler)| (*method, handler))
    }

    /// Returns the number of bound methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns whether no method is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<H> FromIterator<(Method, H)> for Route<H> {
    fn from_iter<I: IntoIterator<Item = (Method, H)>>(iter: I) -> Self {
        Self {
            methods: iter.into_iter().collect(),
        }
    }
}
