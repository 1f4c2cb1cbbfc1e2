//! Error types for routing.

use thiserror::Error;

/// Router-specific errors.
///
/// An unmatched path is not an error: lookups report it through
/// [`Lookup::handler`](crate::Lookup::handler) being `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The HTTP method is not in the supported allow-list.
    #[error("method {0} unknown, method can only be one of {list}", list = crate::Method::ALLOWED.join(", "))]
    UnknownMethod(String),

    /// Strict registration on a path and method that is already bound.
    #[error("route {method} {path} already declared")]
    DuplicateRoute { method: String, path: String },

    /// A regular-expression segment failed to compile.
    #[error("invalid path pattern: {0}")]
    InvalidPattern(String),

    /// A required path parameter was not captured.
    #[error("missing path parameter: {0}")]
    MissingParam(String),
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
