//! Error types for request dispatch.

use edgework_router::RouterError;
use thiserror::Error;

/// Errors raised while building an app or serving a request.
#[derive(Debug, Error)]
pub enum AppError {
    /// Routing error.
    #[error(transparent)]
    Router(#[from] RouterError),

    /// The same processor instance was registered twice.
    #[error("{0} already registered")]
    DuplicateProcessor(&'static str),

    /// A handler or processor failed.
    #[error("handler failed: {0}")]
    Handler(String),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request URL could not be parsed.
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl AppError {
    /// Creates a handler failure from any displayable message.
    pub fn handler(message: impl std::fmt::Display) -> Self {
        Self::Handler(message.to_string())
    }
}

/// Result type alias for app operations.
pub type Result<T> = std::result::Result<T, AppError>;
