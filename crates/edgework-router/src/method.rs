//! HTTP method allow-list.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, RouterError};

/// HTTP request methods a route can be bound to.
///
/// `Any` is the wildcard: a handler bound to it answers every method that
/// has no handler of its own on the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    /// GET method
    Get,
    /// HEAD method
    Head,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// PATCH method
    Patch,
    /// DELETE method
    Delete,
    /// OPTIONS method
    Options,
    /// CONNECT method
    Connect,
    /// TRACE method
    Trace,
    /// Wildcard matching every method.
    Any,
}

impl Method {
    /// Lower-cased names accepted by [`Method::parse`].
    pub const ALLOWED: &'static [&'static str] = &[
        "get", "head", "post", "put", "patch", "delete", "options", "connect", "trace", "any",
    ];

    /// Parses a method name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnknownMethod`] carrying the offending value when
    /// the name is not in [`Method::ALLOWED`].
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "head" => Ok(Self::Head),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "patch" => Ok(Self::Patch),
            "delete" => Ok(Self::Delete),
            "options" => Ok(Self::Options),
            "connect" => Ok(Self::Connect),
            "trace" => Ok(Self::Trace),
            "any" => Ok(Self::Any),
            _ => Err(RouterError::UnknownMethod(s.to_string())),
        }
    }

    /// Returns the lower-cased method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Head => "head",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Connect => "connect",
            Self::Trace => "trace",
            Self::Any => "any",
        }
    }

    /// Returns whether this is the `any` wildcard.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl FromStr for Method {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Method {
    type Error = RouterError;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
