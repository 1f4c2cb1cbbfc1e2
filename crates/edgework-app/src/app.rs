//! Request lifecycle: route, pre-process, handle, post-process.

use std::future::Future;
use std::sync::Arc;

use edgework_router::{PathParams, Router};
use futures::future::BoxFuture;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::{AppError, Result};
use crate::processor::{run_post, run_pre, Flow, PostProcessor, PreProcessor};
use crate::request::Request;
use crate::response::{Reply, Response};

/// A request handler.
///
/// Handlers receive the request, the captured path parameters and the state
/// produced by the pre-processors.
pub type Handler =
    Arc<dyn Fn(Request, PathParams, Value) -> BoxFuture<'static, Result<Reply>> + Send + Sync>;

type ErrorHandler =
    Arc<dyn Fn(AppError, Request, PathParams) -> BoxFuture<'static, Response> + Send + Sync>;

/// Wraps an async function into a [`Handler`].
///
/// # Example
///
/// ```
/// use edgework_app::{handler, Handler, PathParams, Request};
/// use serde_json::{json, Value};
///
/// let show: Handler = handler(|_req: Request, params: PathParams, _state: Value| async move {
///     Ok::<_, edgework_app::AppError>(json!({ "id": params.require("id")? }))
/// });
/// ```
pub fn handler<F, Fut, R>(f: F) -> Handler
where
    F: Fn(Request, PathParams, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R>> + Send + 'static,
    R: Into<Reply>,
{
    Arc::new(
        move |request: Request, params: PathParams, state: Value| -> BoxFuture<'static, Result<Reply>> {
            let fut = f(request, params, state);
            Box::pin(async move { fut.await.map(Into::into) })
        },
    )
}

/// Ties a router to its processors and turns requests into responses.
///
/// # Example
///
/// ```
/// use edgework_app::{handler, App, PathParams, Request, Router};
/// use serde_json::{json, Value};
///
/// # tokio_test::block_on(async {
/// let router = Router::new().get(
///     "/plep/:plop",
///     handler(|_: Request, params: PathParams, _: Value| async move {
///         Ok::<_, edgework_app::AppError>(json!({ "plop": params.get("plop") }))
///     }),
/// )?;
///
/// let app = App::new(router);
/// let response = app.run(Request::get("https://example.com/plep/5")).await;
/// assert_eq!(response.status, 200);
/// assert_eq!(response.body_string().as_deref(), Some(r#"{"plop":"5"}"#));
/// # Ok::<(), edgework_app::AppError>(())
/// # }).unwrap();
/// ```
pub struct App {
    router: Arc<Router<Handler>>,
    not_found: Handler,
    pre: Vec<Arc<dyn PreProcessor>>,
    post: Vec<Arc<dyn PostProcessor>>,
    error_handler: Option<ErrorHandler>,
}

impl App {
    /// Creates an app serving `router`.
    #[must_use]
    pub fn new(router: Router<Handler>) -> Self {
        Self {
            router: Arc::new(router),
            not_found: handler(|_, _, _| async { Ok::<_, AppError>(Response::not_found()) }),
            pre: Vec::new(),
            post: Vec::new(),
            error_handler: None,
        }
    }

    /// Returns the router.
    #[must_use]
    pub fn router(&self) -> &Router<Handler> {
        &self.router
    }

    /// Returns the registered pre-processors.
    #[must_use]
    pub fn pre_processors(&self) -> &[Arc<dyn PreProcessor>] {
        &self.pre
    }

    /// Returns the registered post-processors.
    #[must_use]
    pub fn post_processors(&self) -> &[Arc<dyn PostProcessor>] {
        &self.post
    }

    /// Registers a pre-processor.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateProcessor`] if this very processor is
    /// already registered.
    pub fn pre_process(&mut self, processor: Arc<dyn PreProcessor>) -> Result<()> {
        if self.pre.iter().any(|p| Arc::ptr_eq(p, &processor)) {
            return Err(AppError::DuplicateProcessor("pre-processor"));
        }
        self.pre.push(processor);
        Ok(())
    }

    /// Registers a post-processor.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateProcessor`] if this very processor is
    /// already registered.
    pub fn post_process(&mut self, processor: Arc<dyn PostProcessor>) -> Result<()> {
        if self.post.iter().any(|p| Arc::ptr_eq(p, &processor)) {
            return Err(AppError::DuplicateProcessor("post-processor"));
        }
        self.post.push(processor);
        Ok(())
    }

    /// Sets the handler turning failures into responses.
    ///
    /// Without one, failures become an empty 500.
    pub fn error<F, Fut>(&mut self, f: F)
    where
        F: Fn(AppError, Request, PathParams) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.error_handler = Some(Arc::new(
            move |err: AppError, request: Request, params: PathParams| -> BoxFuture<'static, Response> {
                Box::pin(f(err, request, params))
            },
        ));
    }

    /// Serves one request.
    ///
    /// Never fails: routing problems become 400/405 responses and errors
    /// from processors or the handler go through the error handler.
    pub async fn run(&self, request: Request) -> Response {
        let path = match request.path() {
            Ok(path) => path,
            Err(err) => {
                warn!(url = %request.url, error = %err, "rejecting request");
                return Response::bad_request();
            }
        };

        let (handler, params) = match self.router.lookup(&request.method, &path) {
            Ok(lookup) => {
                let handler = lookup
                    .handler
                    .cloned()
                    .unwrap_or_else(|| self.not_found.clone());
                (handler, lookup.params)
            }
            Err(err) => {
                warn!(method = %request.method, error = %err, "rejecting request");
                return Response::method_not_allowed();
            }
        };

        debug!(method = %request.method, path = %path, params = params.len(), "dispatching");

        match self.dispatch(&handler, &request, &params).await {
            Ok(response) => {
                debug!(status = response.status, "responded");
                response
            }
            Err(err) => {
                error!(method = %request.method, path = %path, error = %err, "request failed");
                match &self.error_handler {
                    Some(on_error) => on_error(err, request, params).await,
                    None => Response::internal_server_error(),
                }
            }
        }
    }

    async fn dispatch(
        &self,
        handler: &Handler,
        request: &Request,
        params: &PathParams,
    ) -> Result<Response> {
        let response = match run_pre(&self.pre, request, params).await? {
            Flow::Continue(state) => handler(request.clone(), params.clone(), state)
                .await?
                .into_response(),
            Flow::Respond(response) => response,
        };
        run_post(&self.post, response, request, params).await
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("routes", &self.router.entries().count())
            .field("pre", &self.pre.len())
            .field("post", &self.post.len())
            .field("error_handler", &self.error_handler.is_some())
            .finish()
    }
}
