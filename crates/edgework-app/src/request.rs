//! HTTP request type.

use std::collections::HashMap;

use url::Url;

use crate::error::Result;
use crate::headers::Headers;

/// Base used to resolve requests that carry only a path.
const RELATIVE_BASE: &str = "http://localhost";

/// An inbound HTTP request.
///
/// The method is kept as received so that verbs outside the router's
/// allow-list still reach the app, which answers them itself.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method, as sent by the client.
    pub method: String,
    /// Request URL, absolute or just a path.
    pub url: String,
    /// Request headers.
    pub headers: Headers,
    /// Request body.
    pub body: Vec<u8>,
}

impl Request {
    /// Creates a new request.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Creates a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// Creates a POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.set(key, value);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Gets a header value.
    #[must_use]
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// Parses the request URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`](crate::AppError::InvalidUrl) when the
    /// URL is malformed.
    pub fn parsed_url(&self) -> Result<Url> {
        match Url::parse(&self.url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                // `//a/b` would otherwise be read as host `a`.
                let path = format!("/{}", self.url.trim_start_matches('/'));
                Ok(Url::parse(RELATIVE_BASE)?.join(&path)?)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the URL path, still percent-encoded.
    ///
    /// # Errors
    ///
    /// See [`Request::parsed_url`].
    pub fn path(&self) -> Result<String> {
        Ok(self.parsed_url()?.path().to_string())
    }

    /// Returns the decoded query parameters. Later duplicates win.
    ///
    /// # Errors
    ///
    /// See [`Request::parsed_url`].
    pub fn query(&self) -> Result<HashMap<String, String>> {
        Ok(self
            .parsed_url()?
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect())
    }

    /// Gets a single query parameter.
    #[must_use]
    pub fn get_query(&self, key: &str) -> Option<String> {
        self.parsed_url().ok().and_then(|url| {
            url.query_pairs()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.into_owned())
        })
    }

    /// Returns the body as a string.
    #[must_use]
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Serialization`](crate::AppError::Serialization)
    /// when the body is not valid JSON for `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
