//! Key-value storage backends.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use futures::future::BoxFuture;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::trace;

use crate::error::Result;

/// Options for [`KvStore::put`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutOptions {
    /// Absolute expiry time.
    pub expiration: Option<DateTime<Utc>>,
    /// Time to live, counted from the write.
    pub expiration_ttl: Option<Duration>,
    /// Arbitrary JSON stored alongside the value.
    pub metadata: Option<Value>,
}

impl PutOptions {
    /// Creates options with no expiry and no metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expires the entry at `at`.
    #[must_use]
    pub fn expiration(mut self, at: DateTime<Utc>) -> Self {
        self.expiration = Some(at);
        self
    }

    /// Expires the entry `ttl` after it is written.
    #[must_use]
    pub fn expiration_ttl(mut self, ttl: Duration) -> Self {
        self.expiration_ttl = Some(ttl);
        self
    }

    /// Attaches metadata to the entry.
    #[must_use]
    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Resolves the expiry of an entry written at `now`.
    ///
    /// When both an absolute time and a TTL are given the earlier one wins.
    /// A TTL reaching past the representable range never expires.
    #[must_use]
    pub fn expires_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let ttl = self
            .expiration_ttl
            .and_then(|ttl| now.checked_add_signed(ttl));
        match (self.expiration, ttl) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

/// A stored value with its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// The stored value.
    pub value: String,
    /// Metadata given at write time.
    pub metadata: Option<Value>,
    /// When the entry stops being visible.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    /// Returns whether the entry has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// An asynchronous string key-value store.
///
/// Expired entries behave exactly like missing ones.
pub trait KvStore: Send + Sync {
    /// Reads an entry with its metadata.
    fn get_with_metadata<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Entry>>>;

    /// Writes a value, replacing any previous entry.
    fn put<'a>(
        &'a self,
        key: &'a str,
        value: String,
        options: PutOptions,
    ) -> BoxFuture<'a, Result<()>>;

    /// Removes an entry. Removing a missing key is not an error.
    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Reads a value.
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move { Ok(self.get_with_metadata(key).await?.map(|entry| entry.value)) })
    }
}

/// An in-process [`KvStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live entries.
    pub async fn len(&self) -> usize {
        let now = Utc::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    /// Returns whether there are no live entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops expired entries, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }
}

impl KvStore for MemoryStore {
    fn get_with_metadata<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Entry>>> {
        Box::pin(async move {
            let now = Utc::now();
            let entry = self.entries.read().await.get(key).cloned();
            match entry {
                Some(entry) if entry.is_expired(now) => {
                    let mut entries = self.entries.write().await;
                    // Rewritten between the two locks: keep the newer entry.
                    if entries.get(key).is_some_and(|e| e.is_expired(now)) {
                        entries.remove(key);
                    }
                    trace!(key, "kv get evicted expired entry");
                    Ok(None)
                }
                entry => {
                    trace!(key, hit = entry.is_some(), "kv get");
                    Ok(entry)
                }
            }
        })
    }

    fn put<'a>(
        &'a self,
        key: &'a str,
        value: String,
        options: PutOptions,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let entry = Entry {
                value,
                expires_at: options.expires_at(Utc::now()),
                metadata: options.metadata,
            };
            trace!(key, expires_at = ?entry.expires_at, "kv put");
            self.entries.write().await.insert(key.to_string(), entry);
            Ok(())
        })
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            trace!(key, "kv delete");
            self.entries.write().await.remove(key);
            Ok(())
        })
    }
}
