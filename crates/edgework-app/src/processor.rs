//! Pre- and post-processing around request handlers.

use std::sync::Arc;

use edgework_router::PathParams;
use futures::future::{self, BoxFuture};
use serde_json::Value;

use crate::error::Result;
use crate::request::Request;
use crate::response::Response;

/// Outcome of a processor: keep going, or answer right away.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow<T> {
    /// Hand the value to the next processor.
    Continue(T),
    /// Stop the chain with this response.
    Respond(Response),
}

/// Runs before the handler.
///
/// Pre-processors are chained in registration order. The first one receives
/// [`Value::Null`]; each following one receives what its predecessor
/// continued with, and the last value reaches the handler as its state.
/// Responding skips the remaining pre-processors and the handler; the
/// response still goes through post-processing.
///
/// # Example
///
/// ```
/// use edgework_app::{BoxFuture, Flow, PathParams, PreProcessor, Request, Response, Result};
/// use serde_json::Value;
///
/// struct RequireAuth;
///
/// impl PreProcessor for RequireAuth {
///     fn process<'a>(
///         &'a self,
///         state: Value,
///         request: &'a Request,
///         _params: &'a PathParams,
///     ) -> BoxFuture<'a, Result<Flow<Value>>> {
///         Box::pin(async move {
///             if request.get_header("Authorization").is_some() {
///                 Ok(Flow::Continue(state))
///             } else {
///                 Ok(Flow::Respond(Response::empty(401)))
///             }
///         })
///     }
/// }
/// ```
pub trait PreProcessor: Send + Sync {
    /// Processes the request.
    fn process<'a>(
        &'a self,
        state: Value,
        request: &'a Request,
        params: &'a PathParams,
    ) -> BoxFuture<'a, Result<Flow<Value>>>;
}

/// Runs after the handler.
///
/// Post-processors are chained in registration order, the first one
/// receiving the handler's response. Responding stops the chain with that
/// response.
pub trait PostProcessor: Send + Sync {
    /// Processes the response.
    fn process<'a>(
        &'a self,
        response: Response,
        request: &'a Request,
        params: &'a PathParams,
    ) -> BoxFuture<'a, Result<Flow<Response>>>;
}

/// A synchronous closure used as a pre-processor.
pub struct PreFn<F>(F);

impl<F> PreProcessor for PreFn<F>
where
    F: Fn(Value, &Request, &PathParams) -> Result<Flow<Value>> + Send + Sync,
{
    fn process<'a>(
        &'a self,
        state: Value,
        request: &'a Request,
        params: &'a PathParams,
    ) -> BoxFuture<'a, Result<Flow<Value>>> {
        Box::pin(future::ready((self.0)(state, request, params)))
    }
}

/// A synchronous closure used as a post-processor.
pub struct PostFn<F>(F);

impl<F> PostProcessor for PostFn<F>
where
    F: Fn(Response, &Request, &PathParams) -> Result<Flow<Response>> + Send + Sync,
{
    fn process<'a>(
        &'a self,
        response: Response,
        request: &'a Request,
        params: &'a PathParams,
    ) -> BoxFuture<'a, Result<Flow<Response>>> {
        Box::pin(future::ready((self.0)(response, request, params)))
    }
}

/// Wraps a closure into a shareable pre-processor.
pub fn pre_fn<F>(f: F) -> Arc<dyn PreProcessor>
where
    F: Fn(Value, &Request, &PathParams) -> Result<Flow<Value>> + Send + Sync + 'static,
{
    Arc::new(PreFn(f))
}

/// Wraps a closure into a shareable post-processor.
pub fn post_fn<F>(f: F) -> Arc<dyn PostProcessor>
where
    F: Fn(Response, &Request, &PathParams) -> Result<Flow<Response>> + Send + Sync + 'static,
{
    Arc::new(PostFn(f))
}

/// Runs `processors` in order, starting from [`Value::Null`].
pub(crate) async fn run_pre(
    processors: &[Arc<dyn PreProcessor>],
    request: &Request,
    params: &PathParams,
) -> Result<Flow<Value>> {
    let mut state = Value::Null;
    for processor in processors {
        match processor.process(state, request, params).await? {
            Flow::Continue(next) => state = next,
            Flow::Respond(response) => return Ok(Flow::Respond(response)),
        }
    }
    Ok(Flow::Continue(state))
}

/// Runs `processors` in order over `response`.
pub(crate) async fn run_post(
    processors: &[Arc<dyn PostProcessor>],
    mut response: Response,
    request: &Request,
    params: &PathParams,
) -> Result<Response> {
    for processor in processors {
        match processor.process(response, request, params).await? {
            Flow::Continue(next) => response = next,
            Flow::Respond(response) => return Ok(response),
        }
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_pre_chain_threads_state() {
        let request = Request::get("/");
        let mut params = PathParams::new();
        params.insert("n", "5");

        let processors = vec![
            pre_fn(|state: Value, _: &Request, params: &PathParams| {
                assert!(state.is_null());
                params.require("n")?;
                let n: i64 = params.parse("n").unwrap_or_default();
                Ok(Flow::Continue(Value::from(n + 3)))
            }),
            pre_fn(|state: Value, _: &Request, _: &PathParams| {
                let n = state.as_i64().unwrap_or_default();
                Ok(Flow::Continue(Value::from(n * 7)))
            }),
        ];

        let flow = run_pre(&processors, &request, &params).await.unwrap();
        assert_eq!(flow, Flow::Continue(Value::from((5 + 3) * 7)));
    }

    #[tokio::test]
    async fn test_pre_chain_stops_on_respond() {
        let request = Request::get("/");
        let params = PathParams::new();

        let processors = vec![
            pre_fn(|_: Value, _: &Request, _: &PathParams| {
                Ok(Flow::Respond(Response::empty(418)))
            }),
            pre_fn(|_: Value, _: &Request, _: &PathParams| {
                Err(AppError::handler("unreachable processor ran"))
            }),
        ];

        let flow = run_pre(&processors, &request, &params).await.unwrap();
        assert_eq!(flow, Flow::Respond(Response::empty(418)));
    }

    #[tokio::test]
    async fn test_post_chain_starts_from_response() {
        let request = Request::get("/");
        let params = PathParams::new();

        let processors = vec![
            post_fn(|response: Response, _: &Request, _: &PathParams| {
                assert_eq!(response.status, 200);
                Ok(Flow::Continue(response.status(201)))
            }),
            post_fn(|response: Response, _: &Request, _: &PathParams| {
                Ok(Flow::Continue(response.header("X-Seen", "yes")))
            }),
        ];

        let response = run_post(&processors, Response::ok(), &request, &params)
            .await
            .unwrap();
        assert_eq!(response.status, 201);
        assert_eq!(response.headers.get("x-seen"), Some("yes"));
    }

    #[tokio::test]
    async fn test_post_chain_errors_propagate() {
        let request = Request::get("/");
        let params = PathParams::new();

        let processors = vec![post_fn(|_: Response, _: &Request, _: &PathParams| {
            Err(AppError::handler("boom"))
        })];

        let err = run_post(&processors, Response::ok(), &request, &params)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Handler(msg) if msg == "boom"));
    }
}
