//! Dispatches a single request through a small link-shortener app.
//!
//! ```text
//! cargo run -p edgework-app --example dispatch -- --method PUT \
//!     --data '{"target":"https://docs.rs"}' /links/docs
//! EDGEWORK_URL=/links/docs cargo run -p edgework-app --example dispatch
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use edgework_app::{
    handler, pre_fn, App, AppError, Cors, CorsConfig, Flow, PathParams, Request, Response, Router,
};
use edgework_model::{KvStore, MemoryStore, Model, PutOptions};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Run one request through the demo app and print the response.
#[derive(Parser)]
#[command(name = "dispatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Request URL, absolute or just a path.
    #[arg(env = "EDGEWORK_URL", default_value = "/")]
    url: String,

    /// HTTP method.
    #[arg(short = 'X', long, env = "EDGEWORK_METHOD", default_value = "GET")]
    method: String,

    /// Request body.
    #[arg(short, long)]
    data: Option<String>,

    /// Extra header, as `Name: value`. Repeatable.
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// CORS settings as JSON, e.g. `{"origin":"https://leakix.net"}`.
    #[arg(long, env = "EDGEWORK_CORS")]
    cors: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct Link {
    slug: String,
    target: String,
}

impl Model for Link {
    const PREFIX: &'static str = "link";

    fn id(&self) -> Option<String> {
        Some(self.slug.clone())
    }
}

#[derive(Deserialize)]
struct NewLink {
    target: String,
    #[serde(default)]
    ttl_seconds: Option<i64>,
}

fn build_app(store: Arc<dyn KvStore>, cors: Cors) -> anyhow::Result<App> {
    let links = Link::objects(store);
    let reader = links.clone();

    let router = Router::new()
        .get(
            "/",
            handler(|_, _, _| async { Ok::<_, AppError>("edgework demo") }),
        )?
        .get(
            "/links/:slug",
            handler(move |_, params: PathParams, _| {
                let links = reader.clone();
                async move {
                    let slug = params.require("slug")?;
                    let link = links.get(slug).await.map_err(AppError::handler)?;
                    Ok::<_, AppError>(match link {
                        Some(link) => Response::empty(302).header("Location", link.target),
                        None => Response::not_found(),
                    })
                }
            }),
        )?
        .put(
            "/links/:slug",
            handler(move |req: Request, params: PathParams, _| {
                let links = links.clone();
                async move {
                    let body: NewLink = req.json()?;
                    let link = Link {
                        slug: params.require("slug")?.to_string(),
                        target: body.target,
                    };
                    let mut options = PutOptions::new();
                    if let Some(ttl) = body.ttl_seconds {
                        let Some(ttl) = chrono::Duration::try_seconds(ttl) else {
                            return Ok(Response::bad_request());
                        };
                        options = options.expiration_ttl(ttl);
                    }
                    links
                        .save_with(&link, options)
                        .await
                        .map_err(AppError::handler)?;
                    Ok::<_, AppError>(Response::json(&link).status(201))
                }
            }),
        )?
        .any(
            "/echo/:what",
            handler(|req: Request, params: PathParams, state: Value| async move {
                Ok::<_, AppError>(json!({
                    "method": req.method,
                    "what": params.get("what"),
                    "query": req.query()?,
                    "state": state,
                }))
            }),
        )?;

    let mut app = App::new(router);
    app.pre_process(pre_fn(|_: Value, req: &Request, _: &PathParams| {
        Ok(Flow::Continue(json!({
            "user_agent": req.get_header("User-Agent"),
        })))
    }))?;
    app.post_process(cors.into_post_processor())?;
    app.error(|err: AppError, _: Request, _: PathParams| async move {
        Response::json(&json!({ "error": err.to_string() })).status(500)
    });
    Ok(app)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cors_config: CorsConfig = match &cli.cors {
        Some(raw) => serde_json::from_str(raw).context("invalid CORS settings")?,
        None => CorsConfig::default(),
    };

    let app = build_app(Arc::new(MemoryStore::new()), Cors::from(cors_config))?;

    let mut request = Request::new(cli.method, cli.url);
    for header in &cli.headers {
        let (name, value) = header
            .split_once(':')
            .with_context(|| format!("header {header:?} is not `Name: value`"))?;
        request = request.header(name.trim(), value.trim());
    }
    if let Some(data) = cli.data {
        request = request.body(data);
    }

    info!(method = %request.method, url = %request.url, "dispatching");
    let response = app.run(request).await;

    println!("{} {}", response.status, response.status_text());
    for (name, value) in response.headers.iter() {
        println!("{name}: {value}");
    }
    if let Some(body) = response.body_string() {
        println!();
        println!("{body}");
    }

    Ok(())
}
