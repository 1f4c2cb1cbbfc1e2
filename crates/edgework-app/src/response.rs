//! HTTP response type and handler reply conversion.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::headers::Headers;

/// An HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Headers,
    /// Response body; `None` when the response has no body at all.
    pub body: Option<Vec<u8>>,
}

impl Response {
    /// Creates a new response with the given status and no body.
    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: None,
        }
    }

    /// Creates a 200 OK response.
    #[must_use]
    pub fn ok() -> Self {
        Self::empty(200)
    }

    /// Creates a response with JSON content.
    ///
    /// Falls back to a 500 response if `data` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(data: &T) -> Self {
        match serde_json::to_vec(data) {
            Ok(body) => Self::ok()
                .header("Content-Type", "application/json")
                .body(body),
            Err(_) => Self::internal_server_error(),
        }
    }

    /// Creates a response with plain text content.
    pub fn text(body: impl Into<String>) -> Self {
        Self::ok()
            .header("Content-Type", "text/plain")
            .body(body.into())
    }

    /// Creates a response with raw bytes.
    pub fn bytes(body: impl Into<Vec<u8>>) -> Self {
        Self::ok()
            .header("Content-Type", "application/octet-stream")
            .body(body)
    }

    /// Creates a 404 Not Found response.
    #[must_use]
    pub fn not_found() -> Self {
        Self::empty(404)
    }

    /// Creates a 405 Method Not Allowed response.
    #[must_use]
    pub fn method_not_allowed() -> Self {
        Self::empty(405)
    }

    /// Creates a 400 Bad Request response.
    #[must_use]
    pub fn bad_request() -> Self {
        Self::empty(400)
    }

    /// Creates a 500 Internal Server Error response.
    #[must_use]
    pub fn internal_server_error() -> Self {
        Self::empty(500)
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.set(key, value);
        self
    }

    /// Sets the status code.
    #[must_use]
    pub const fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns the body as a string.
    #[must_use]
    pub fn body_string(&self) -> Option<String> {
        self.body
            .as_ref()
            .and_then(|body| String::from_utf8(body.clone()).ok())
    }

    /// Returns the status text for the current status code.
    #[must_use]
    pub const fn status_text(&self) -> &'static str {
        match self.status {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            418 => "I'm a teapot",
            422 => "Unprocessable Entity",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::ok()
    }
}

/// What a handler hands back before it becomes a [`Response`].
///
/// Handlers may build a full response themselves or return plain data:
/// text becomes `text/plain`, JSON values (objects, numbers, booleans…)
/// become `application/json`, and bytes become `application/octet-stream`,
/// all with status 200.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A finished response, passed through untouched.
    Response(Response),
    /// Plain text.
    Text(String),
    /// A JSON document.
    Json(Value),
    /// Raw bytes.
    Bytes(Vec<u8>),
}

impl Reply {
    /// Serializes any value into a JSON reply.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Serialization`](crate::AppError::Serialization)
    /// if `value` cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Converts the reply into a response.
    #[must_use]
    pub fn into_response(self) -> Response {
        match self {
            Self::Response(response) => response,
            Self::Text(text) => Response::text(text),
            Self::Json(value) => Response::json(&value),
            Self::Bytes(bytes) => Response::bytes(bytes),
        }
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Vec<u8>> for Reply {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

macro_rules! json_reply {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Reply {
                fn from(value: $ty) -> Self {
                    Self::Json(Value::from(value))
                }
            }
        )*
    };
}

json_reply!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl From<Reply> for Response {
    fn from(reply: Reply) -> Self {
        reply.into_response()
    }
}
