//! # edgework-router
//!
//! A routing trie for short-lived, stateless request handlers.
//!
//! This crate provides:
//! - Literal, named-parameter and regular-expression path segments
//! - Per-method handler tables with an `any` wildcard
//! - Strict registration that refuses to rebind a method
//! - A fallback route for unmatched requests
//! - Tree merging to mount one router under a prefix of another
//!
//! The router never inspects or calls handlers; it stores whatever value it
//! is given and hands it back on lookup.
//!
//! ## Quick Start
//!
//! ```
//! use edgework_router::Router;
//!
//! let router = Router::new()
//!     .get("/", "index")?
//!     .get("/users/:id", "show_user")?
//!     .post("/users", "create_user")?;
//!
//! let lookup = router.lookup("GET", "/users/123")?;
//! assert_eq!(lookup.handler, Some(&"show_user"));
//! assert_eq!(lookup.params.get("id"), Some("123"));
//! # Ok::<(), edgework_router::RouterError>(())
//! ```
//!
//! ## Path Segments
//!
//! String paths split on `/`. A segment starting with `:` captures any value
//! under that name; anything else must match exactly. Regular expressions can
//! only be placed through an explicit segment list:
//!
//! ```
//! use edgework_router::{Router, Segment};
//!
//! let router = Router::new().get(
//!     vec![
//!         Segment::from("posts"),
//!         Segment::pattern("[0-9]{4}")?,
//!         Segment::from(":slug"),
//!     ],
//!     "post_by_year",
//! )?;
//!
//! assert!(router.lookup("GET", "/posts/2024/hello")?.is_found());
//! assert!(!router.lookup("GET", "/posts/24/hello")?.is_found());
//! # Ok::<(), edgework_router::RouterError>(())
//! ```
//!
//! At each depth a literal child wins over the parameter child, which wins
//! over patterns; patterns are tried in registration order.
//!
//! ## Mounting
//!
//! ```
//! use edgework_router::Router;
//!
//! let api = Router::new().get("/users/:id", "show_user")?;
//! let router = Router::new().get("/", "index")?.mount("/api", &api);
//!
//! assert!(router.lookup("GET", "/api/users/1")?.is_found());
//! # Ok::<(), edgework_router::RouterError>(())
//! ```

mod error;
mod method;
mod params;
mod path;
mod route;
mod router;
mod tree;

pub use error::{Result, RouterError};
pub use method::Method;
pub use params::PathParams;
pub use path::{split, PathSpec, Pattern, Segment};
pub use route::Route;
pub use router::{Router, RouterOptions};
pub use tree::{Entries, Lookup, RouterNode, RouterTree};
