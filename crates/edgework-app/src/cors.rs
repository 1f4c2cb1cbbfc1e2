//! Cross-origin resource sharing headers.

use std::fmt;
use std::sync::Arc;

use edgework_router::PathParams;
use futures::future::{self, BoxFuture};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::headers::Headers;
use crate::processor::{Flow, PostProcessor};
use crate::request::Request;
use crate::response::Response;

/// Static CORS settings, loadable from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// `Access-Control-Allow-Origin`.
    pub origin: String,
    /// `Access-Control-Allow-Methods`.
    pub methods: String,
    /// `Access-Control-Max-Age`, in seconds.
    pub max_age: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origin: "*".to_string(),
            methods: "HEAD,PUT,DELETE,POST,GET,OPTIONS".to_string(),
            max_age: "86400".to_string(),
        }
    }
}

type Compute = dyn Fn(&Request, &PathParams) -> String + Send + Sync;

/// A CORS header value, fixed or computed per request.
#[derive(Clone)]
pub enum CorsValue {
    /// The same value for every request.
    Static(String),
    /// A value derived from the request and its path parameters.
    Dynamic(Arc<Compute>),
}

impl CorsValue {
    /// Builds a computed value.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&Request, &PathParams) -> String + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(f))
    }

    /// Resolves the value for a request.
    #[must_use]
    pub fn resolve(&self, request: &Request, params: &PathParams) -> String {
        match self {
            Self::Static(value) => value.clone(),
            Self::Dynamic(compute) => compute(request, params),
        }
    }
}

impl fmt::Debug for CorsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for CorsValue {
    fn from(value: &str) -> Self {
        Self::Static(value.to_string())
    }
}

impl From<String> for CorsValue {
    fn from(value: String) -> Self {
        Self::Static(value)
    }
}

/// Produces CORS headers and stamps them on responses.
///
/// # Example
///
/// ```
/// use edgework_app::{Cors, CorsValue, PathParams, Request};
///
/// let cors = Cors::new().origin(CorsValue::dynamic(|req: &Request, _: &PathParams| {
///     req.get_header("Origin").unwrap_or("*").to_string()
/// }));
///
/// let request = Request::get("/").header("Origin", "https://leakix.net");
/// let headers = cors.headers(&request, &PathParams::new());
/// assert_eq!(headers.get("access-control-allow-origin"), Some("https://leakix.net"));
/// assert_eq!(headers.get("access-control-max-age"), Some("86400"));
/// ```
#[derive(Debug, Clone)]
pub struct Cors {
    origin: CorsValue,
    methods: CorsValue,
    max_age: CorsValue,
}

impl Default for Cors {
    fn default() -> Self {
        Self::from(CorsConfig::default())
    }
}

impl From<CorsConfig> for Cors {
    fn from(config: CorsConfig) -> Self {
        Self {
            origin: config.origin.into(),
            methods: config.methods.into(),
            max_age: config.max_age.into(),
        }
    }
}

impl Cors {
    /// Creates CORS settings with the permissive defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the allowed origin.
    #[must_use]
    pub fn origin(mut self, origin: impl Into<CorsValue>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Sets the allowed methods.
    #[must_use]
    pub fn methods(mut self, methods: impl Into<CorsValue>) -> Self {
        self.methods = methods.into();
        self
    }

    /// Sets the preflight cache duration.
    #[must_use]
    pub fn max_age(mut self, max_age: impl Into<CorsValue>) -> Self {
        self.max_age = max_age.into();
        self
    }

    /// Computes the CORS headers for a request.
    #[must_use]
    pub fn headers(&self, request: &Request, params: &PathParams) -> Headers {
        let mut headers = Headers::new();
        headers.set(
            "Access-Control-Allow-Origin",
            self.origin.resolve(request, params),
        );
        headers.set(
            "Access-Control-Allow-Methods",
            self.methods.resolve(request, params),
        );
        headers.set(
            "Access-Control-Max-Age",
            self.max_age.resolve(request, params),
        );
        headers
    }

    /// Turns these settings into a post-processor for [`App`](crate::App).
    #[must_use]
    pub fn into_post_processor(self) -> Arc<dyn PostProcessor> {
        Arc::new(self)
    }
}

impl PostProcessor for Cors {
    fn process<'a>(
        &'a self,
        mut response: Response,
        request: &'a Request,
        params: &'a PathParams,
    ) -> BoxFuture<'a, Result<Flow<Response>>> {
        response.headers.extend(self.headers(request, params).iter());
        Box::pin(future::ready(Ok(Flow::Continue(response))))
    }
}
