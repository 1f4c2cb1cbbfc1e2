//! # edgework-app
//!
//! Request lifecycle on top of [`edgework_router`].
//!
//! An [`App`] owns a router whose handlers are async functions. For each
//! request it:
//!
//! 1. routes the method and URL path to a handler (404 when nothing matches);
//! 2. runs the [`PreProcessor`]s, which thread a JSON state to the handler
//!    or answer early;
//! 3. calls the handler and converts its [`Reply`] into a [`Response`];
//! 4. runs the [`PostProcessor`]s over the response.
//!
//! Failures in steps 2 to 4 go to the error handler set with [`App::error`],
//! or become an empty 500.
//!
//! ## Example
//!
//! ```
//! use edgework_app::{handler, pre_fn, App, Cors, Flow, PathParams, Request, Router};
//! use serde_json::Value;
//!
//! # tokio_test::block_on(async {
//! let router = Router::new().get(
//!     "/plep/:plop",
//!     handler(|_: Request, _: PathParams, state: Value| async move {
//!         Ok::<_, edgework_app::AppError>(state)
//!     }),
//! )?;
//!
//! let mut app = App::new(router);
//! app.pre_process(pre_fn(|_: Value, _: &Request, params: &PathParams| {
//!     let plop: i64 = params.require("plop")?.parse().unwrap_or_default();
//!     Ok(Flow::Continue(Value::from(plop * 25)))
//! }))?;
//! app.post_process(Cors::new().into_post_processor())?;
//!
//! let response = app.run(Request::get("https://example.com/plep/5")).await;
//! assert_eq!(response.body_string().as_deref(), Some("125"));
//! assert_eq!(response.headers.get("access-control-allow-origin"), Some("*"));
//! # Ok::<(), edgework_app::AppError>(())
//! # }).unwrap();
//! ```

mod app;
mod cors;
mod error;
mod headers;
mod processor;
mod request;
mod response;

pub use app::{handler, App, Handler};
pub use cors::{Cors, CorsConfig, CorsValue};
pub use error::{AppError, Result};
pub use headers::Headers;
pub use processor::{post_fn, pre_fn, Flow, PostFn, PostProcessor, PreFn, PreProcessor};
pub use request::Request;
pub use response::{Reply, Response};

pub use edgework_router::{Method, PathParams, PathSpec, Router, RouterOptions, Segment};
pub use futures::future::BoxFuture;
