//! # edgework-model
//!
//! JSON models persisted in a key-value store.
//!
//! A [`Model`] names its key prefix and id; a [`Manager`] reads and writes
//! instances through an explicit [`KvStore`] handle. Nothing is bound
//! globally: every manager is built from the store it should use.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use edgework_model::{MemoryStore, Model};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Link {
//!     slug: String,
//!     target: String,
//! }
//!
//! impl Model for Link {
//!     const PREFIX: &'static str = "link";
//!
//!     fn id(&self) -> Option<String> {
//!         Some(self.slug.clone())
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(MemoryStore::new());
//! let links = Link::objects(store.clone());
//!
//! let link = Link { slug: "docs".into(), target: "https://docs.rs".into() };
//! links.save(&link).await?;
//!
//! assert_eq!(links.get("docs").await?, Some(link));
//! assert_eq!(links.get("missing").await?, None);
//! # Ok::<(), edgework_model::ModelError>(())
//! # }).unwrap();
//! ```

mod error;
mod model;
mod store;

pub use error::{ModelError, Result};
pub use model::{Manager, Model};
pub use store::{Entry, KvStore, MemoryStore, PutOptions};
