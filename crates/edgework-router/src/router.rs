//! Router façade over the routing trie.

use tracing::debug;

use crate::error::Result;
use crate::method::Method;
use crate::path::PathSpec;
use crate::route::Route;
use crate::tree::{Entries, Lookup, RouterTree};

/// Registration behaviour of a [`Router`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterOptions {
    /// Reject re-binding a method on a path instead of replacing it.
    pub strict: bool,
}

/// The main router, mapping methods and paths to handlers.
///
/// Handlers are opaque to the router: they are stored on registration and
/// handed back by [`Router::lookup`] untouched.
///
/// # Example
///
/// ```
/// use edgework_router::Router;
///
/// let router = Router::new()
///     .get("/", "index")?
///     .post("/users", "create_user")?
///     .get("/users/:id", "show_user")?;
///
/// let lookup = router.lookup("GET", "/users/7/")?;
/// assert_eq!(lookup.handler, Some(&"show_user"));
/// assert_eq!(lookup.params.get("id"), Some("7"));
/// # Ok::<(), edgework_router::RouterError>(())
/// ```
#[derive(Debug)]
pub struct Router<H> {
    tree: RouterTree<H>,
    options: RouterOptions,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Router<H> {
    /// Creates a new empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(RouterOptions::default())
    }

    /// Creates a new empty router with the given options.
    #[must_use]
    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            tree: RouterTree::new(),
            options,
        }
    }

    /// Makes every later registration strict.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.options.strict = true;
        self
    }

    /// Returns the registration options.
    #[must_use]
    pub const fn config(&self) -> RouterOptions {
        self.options
    }

    /// Adds a GET route.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::DuplicateRoute`](crate::RouterError::DuplicateRoute)
    /// for a strict router when GET is already answered on `path`.
    pub fn get(self, path: impl Into<PathSpec>, handler: H) -> Result<Self> {
        self.route(Method::Get, path, handler)
    }

    /// Adds a HEAD route.
    ///
    /// # Errors
    ///
    /// See [`Router::get`].
    pub fn head(self, path: impl Into<PathSpec>, handler: H) -> Result<Self> {
        self.route(Method::Head, path, handler)
    }

    /// Adds a POST route.
    ///
    /// # Errors
    ///
    /// See [`Router::get`].
    pub fn post(self, path: impl Into<PathSpec>, handler: H) -> Result<Self> {
        self.route(Method::Post, path, handler)
    }

    /// Adds a PUT route.
    ///
    /// # Errors
    ///
    /// See [`Router::get`].
    pub fn put(self, path: impl Into<PathSpec>, handler: H) -> Result<Self> {
        self.route(Method::Put, path, handler)
    }

    /// Adds a PATCH route.
    ///
    /// # Errors
    ///
    /// See [`Router::get`].
    pub fn patch(self, path: impl Into<PathSpec>, handler: H) -> Result<Self> {
        self.route(Method::Patch, path, handler)
    }

    /// Adds a DELETE route.
    ///
    /// # Errors
    ///
    /// See [`Router::get`].
    pub fn delete(self, path: impl Into<PathSpec>, handler: H) -> Result<Self> {
        self.route(Method::Delete, path, handler)
    }

    /// Adds an OPTIONS route.
    ///
    /// # Errors
    ///
    /// See [`Router::get`].
    pub fn options(self, path: impl Into<PathSpec>, handler: H) -> Result<Self> {
        self.route(Method::Options, path, handler)
    }

    /// Adds a route answering every method without a handler of its own.
    ///
    /// # Errors
    ///
    /// See [`Router::get`].
    pub fn any(self, path: impl Into<PathSpec>, handler: H) -> Result<Self> {
        self.route(Method::Any, path, handler)
    }

    /// Adds a route for `method`.
    ///
    /// # Errors
    ///
    /// See [`Router::get`].
    pub fn route(mut self, method: Method, path: impl Into<PathSpec>, handler: H) -> Result<Self> {
        self.tree
            .register(method, path, handler, self.options.strict)?;
        Ok(self)
    }

    /// Registers a route from a method name.
    ///
    /// The name is matched case-insensitively against [`Method::ALLOWED`].
    /// `strict` applies on top of the router's own option.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnknownMethod`](crate::RouterError::UnknownMethod)
    /// for a method outside the allow-list and
    /// [`RouterError::DuplicateRoute`](crate::RouterError::DuplicateRoute) on a
    /// rejected strict registration.
    pub fn register(
        &mut self,
        method: &str,
        path: impl Into<PathSpec>,
        handler: H,
        strict: bool,
    ) -> Result<()> {
        let method = Method::parse(method)?;
        self.tree
            .register(method, path, handler, strict || self.options.strict)
    }

    /// Answers unmatched requests of any method with `handler`.
    #[must_use]
    pub fn default_handler(self, handler: H) -> Self {
        self.default_for(Method::Any, handler)
    }

    /// Answers unmatched requests of `method` with `handler`.
    #[must_use]
    pub fn default_for(mut self, method: Method, handler: H) -> Self {
        self.tree.set_default(method, handler);
        self
    }

    /// Mounts every route of `other` under `prefix`.
    #[must_use]
    pub fn mount(mut self, prefix: impl Into<PathSpec>, other: &Self) -> Self
    where
        H: Clone,
    {
        let prefix = prefix.into();
        debug!(prefix = %prefix, "mounting router");
        self.tree.merge(prefix, other.tree());
        self
    }

    /// Looks up the handler for a method name and request path.
    ///
    /// The method name is case-insensitive and a trailing `/` on the path is
    /// ignored. An unmatched path is not an error: the returned
    /// [`Lookup`] simply carries no handler.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnknownMethod`](crate::RouterError::UnknownMethod)
    /// for a method outside the allow-list.
    pub fn lookup(&self, method: &str, path: &str) -> Result<Lookup<'_, H>> {
        let method = Method::parse(method)?;
        Ok(self.find(method, path))
    }

    /// Looks up the handler for a parsed method and request path.
    #[must_use]
    pub fn find(&self, method: Method, path: &str) -> Lookup<'_, H> {
        let path = path.strip_suffix('/').unwrap_or(path);
        self.tree.find(method, path)
    }

    /// Iterates over every registered route.
    #[must_use]
    pub fn entries(&self) -> Entries<'_, H> {
        self.tree.entries()
    }

    /// Returns the default route.
    #[must_use]
    pub const fn default_route(&self) -> &Route<H> {
        self.tree.default_route()
    }

    /// Returns the underlying tree.
    #[must_use]
    pub const fn tree(&self) -> &RouterTree<H> {
        &self.tree
    }

    /// Consumes the router, returning the underlying tree.
    #[must_use]
    pub fn into_tree(self) -> RouterTree<H> {
        self.tree
    }
}

impl<H> From<RouterTree<H>> for Router<H> {
    fn from(tree: RouterTree<H>) -> Self {
        Self {
            tree,
            options: RouterOptions::default(),
        }
    }
}
