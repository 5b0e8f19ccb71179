//! Inbound request module
//!
//! A [`Request`] is built once from the complete raw text of one HTTP/1.1
//! request and is read-only afterwards, except for route parameters which
//! a router fills in.

mod body;
mod parser;

pub use body::{Body, UploadedFile};
pub use parser::{normalize_header_name, SERVER_PORT};

use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// Parsed HTTP request
///
/// Header names are exposed upper-cased with `-` replaced by `_`
/// (`Content-Type` becomes `CONTENT_TYPE`). The `Host` header is split into
/// `HOST` and `SERVER_PORT`.
///
/// # Examples
/// ```
/// use rawhttp::Request;
/// let request = Request::parse(
///     "GET /search?q=a%20b HTTP/1.1\r\nHost: ex.com:8080\r\n\r\n",
/// ).unwrap();
/// assert_eq!(request.method(), "GET");
/// assert_eq!(request.path(), "/search");
/// assert_eq!(request.query()["q"], "a b");
/// assert_eq!(request.header("HOST"), Some("ex.com"));
/// assert_eq!(request.header("SERVER_PORT"), Some("8080"));
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    raw: String,
    line: String,
    method: String,
    path: String,
    query_string: Option<String>,
    version: Option<String>,
    header: IndexMap<String, String>,
    cookies: IndexMap<String, String>,
    query: IndexMap<String, String>,
    params: HashMap<String, String>,
    body: Body,
    files: Vec<UploadedFile>,
}

impl Request {
    /// Parse the complete text of one request
    pub fn parse(raw: &str) -> Result<Self> {
        parser::parse(raw)
    }

    /// Parse a request from the bytes read off a socket
    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| Error::MalformedRequest(format!("request is not valid UTF-8: {e}")))?;
        Self::parse(text)
    }

    /// Original request text
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Request line, e.g. `GET /search?q=a HTTP/1.1`
    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path without the query string
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw query string (after `?`), if any
    pub fn query_string(&self) -> Option<&str> {
        self.query_string.as_deref()
    }

    /// Protocol token of the request line, e.g. `HTTP/1.1`
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Look up a header; the name is normalized the same way stored keys are
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header
            .get(&normalize_header_name(name))
            .map(String::as_str)
    }

    pub const fn headers(&self) -> &IndexMap<String, String> {
        &self.header
    }

    pub const fn cookies(&self) -> &IndexMap<String, String> {
        &self.cookies
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Query parameters; values are percent-decoded, keys are not
    pub const fn query(&self) -> &IndexMap<String, String> {
        &self.query
    }

    /// Route parameters, empty until a router fills them in
    pub const fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut HashMap<String, String> {
        &mut self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Uploaded files; multipart decoding is not implemented, so always empty
    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
