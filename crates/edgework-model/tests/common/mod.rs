//! Shared helpers for model tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use edgework_model::{Entry, KvStore, MemoryStore, ModelError, PutOptions, Result};
use futures::future::{self, BoxFuture};

/// A store call, as seen by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Get(String),
    Put(String, String),
    Delete(String),
}

/// Wraps a [`MemoryStore`] and records every call made to it.
///
/// Once [`RecordingStore::fail`] is called every operation reports a
/// backend failure.
#[derive(Debug, Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    calls: Mutex<Vec<Call>>,
    failing: AtomicBool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn unavailable<'a, T: Send + 'a>(&self) -> Option<BoxFuture<'a, Result<T>>> {
        self.failing.load(Ordering::SeqCst).then(|| {
            Box::pin(future::ready(Err(ModelError::Store(
                "backend unavailable".to_string(),
            )))) as BoxFuture<'a, Result<T>>
        })
    }
}

impl KvStore for RecordingStore {
    fn get_with_metadata<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Entry>>> {
        self.record(Call::Get(key.to_string()));
        self.unavailable()
            .unwrap_or_else(|| self.inner.get_with_metadata(key))
    }

    fn put<'a>(
        &'a self,
        key: &'a str,
        value: String,
        options: PutOptions,
    ) -> BoxFuture<'a, Result<()>> {
        self.record(Call::Put(key.to_string(), value.clone()));
        match self.unavailable() {
            Some(failure) => failure,
            None => self.inner.put(key, value, options),
        }
    }

    fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<()>> {
        self.record(Call::Delete(key.to_string()));
        self.unavailable().unwrap_or_else(|| self.inner.delete(key))
    }
}
