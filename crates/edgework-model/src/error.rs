//! Error types for model persistence.

use thiserror::Error;

/// Model-specific errors.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A model without an id cannot be stored.
    #[error("cannot save model with no id")]
    MissingId,

    /// A stored value is not valid JSON for the model, or the model could
    /// not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key-value backend failed.
    ///
    /// [`MemoryStore`](crate::MemoryStore) never fails; this is what other
    /// [`KvStore`](crate::KvStore) implementations return for their
    /// backend errors, and [`Manager`](crate::Manager) passes it through.
    #[error("store error: {0}")]
    Store(String),
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
