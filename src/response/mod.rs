//! Outbound response module
//!
//! [`Response`] accumulates status, headers, cookies and body through
//! chainable mutators and serializes to the bytes handed to the transport.

use indexmap::IndexMap;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

use crate::config::HttpConfig;
use crate::cookie::{CookieJar, CookieOptions};
use crate::error::{Error, Result};
use crate::http::{date, status};

const CRLF: &str = "\r\n";

/// HTTP/1.1 response builder
///
/// Seeded with `Server`, `Date`, `Content-Type`, `Content-Length` and
/// `Connection` headers. `Content-Length` follows every body replacement
/// and always counts UTF-8 bytes.
///
/// # Examples
/// ```
/// use rawhttp::Response;
/// let mut response = Response::new();
/// response
///     .status(201)?
///     .set_headers([("X-Request-Id", "42")])
///     .body("héllo");
/// assert_eq!(response.header("Content-Length"), Some("6"));
///
/// let bytes = response.serialize();
/// assert!(bytes.starts_with(b"HTTP/1.1 201 Created\r\n"));
/// assert!(bytes.ends_with("\r\n\r\nhéllo".as_bytes()));
/// # Ok::<(), rawhttp::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    reason: &'static str,
    headers: IndexMap<String, String>,
    body: Vec<u8>,
    cookies: CookieJar,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Empty `200 OK` response with default header values
    pub fn new() -> Self {
        Self::with_config(&HttpConfig::default())
    }

    /// Empty `200 OK` response with headers seeded from configuration
    pub fn with_config(config: &HttpConfig) -> Self {
        let mut headers = IndexMap::new();
        headers.insert("Server".to_string(), config.server_name.clone());
        headers.insert("Date".to_string(), date::now());
        headers.insert(
            "Content-Type".to_string(),
            config.default_content_type.clone(),
        );
        headers.insert("Content-Length".to_string(), "0".to_string());
        let connection = if config.keep_alive { "keep-alive" } else { "close" };
        headers.insert("Connection".to_string(), connection.to_string());

        Self {
            status: 200,
            reason: "OK",
            headers,
            body: Vec::new(),
            cookies: CookieJar::new(),
        }
    }

    /// `200 OK` response carrying `body`
    pub fn with_body(body: impl Into<String>) -> Self {
        let mut response = Self::new();
        response.body(body);
        response
    }

    /// Plain-text response whose body is the status line text, e.g. `404 Not Found`
    pub fn canned(code: u16) -> Result<Self> {
        let mut response = Self::new();
        response.status(code)?;
        let text = format!("{code} {}", response.reason);
        response
            .set_headers([("Content-Type", "text/plain; charset=utf-8")])
            .body(text);
        Ok(response)
    }

    /// Response for an error that escaped parsing or a handler
    ///
    /// The connection is closed since the peer may be out of sync.
    pub fn error_for(err: &Error) -> Self {
        let code = err.status_code();
        let mut response = Self::new();
        // status_code() only yields registered codes
        let reason = status::reason_for(code).unwrap_or("Internal Server Error");
        response.status = code;
        response.reason = reason;
        response
            .set_headers([("Content-Type", "text/plain; charset=utf-8")])
            .close_connection()
            .body(format!("{code} {reason}: {err}"));
        response
    }

    /// Merge headers, overwriting existing names (ASCII case-insensitive)
    pub fn set_headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.insert_header(name.into(), value.into());
        }
        self
    }

    /// Add or replace a cookie
    pub fn set_cookie(&mut self, name: &str, value: &str, options: &CookieOptions) -> &mut Self {
        self.cookies.set(name, value, options);
        self
    }

    /// Set the status code; fails for codes outside the registry
    pub fn status(&mut self, code: u16) -> Result<&mut Self> {
        self.reason = status::reason_for(code)?;
        self.status = code;
        Ok(self)
    }

    /// Force `Connection: close`
    pub fn close_connection(&mut self) -> &mut Self {
        self.insert_header("Connection".to_string(), "close".to_string());
        self
    }

    /// Replace the body with text
    pub fn body(&mut self, content: impl Into<String>) -> &mut Self {
        self.bytes(content.into().into_bytes())
    }

    /// Replace the body with raw bytes
    pub fn bytes(&mut self, content: impl Into<Vec<u8>>) -> &mut Self {
        self.body = content.into();
        let length = self.body.len().to_string();
        self.insert_header("Content-Length".to_string(), length);
        self
    }

    /// Replace the body with `content` serialized as JSON
    pub fn json<T: Serialize + ?Sized>(&mut self, content: &T) -> Result<&mut Self> {
        let json = serde_json::to_string(content).map_err(Error::BodyEncode)?;
        self.insert_header("Content-Type".to_string(), "application/json".to_string());
        Ok(self.body(json))
    }

    pub const fn status_code(&self) -> u16 {
        self.status
    }

    pub const fn reason(&self) -> &'static str {
        self.reason
    }

    pub const fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// Header value by name (ASCII case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, with invalid UTF-8 replaced
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub const fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    /// Whether the transport may keep the connection open after this response
    pub fn keep_alive(&self) -> bool {
        !self
            .header("Connection")
            .is_some_and(|v| v.eq_ignore_ascii_case("close"))
    }

    /// Wire form: status line, headers, cookie lines, blank line, body
    pub fn serialize(&self) -> Vec<u8> {
        let head = self.format_head();
        let mut bytes = Vec::with_capacity(head.len() + 4 + self.body.len());
        bytes.extend_from_slice(head.as_bytes());
        bytes.extend_from_slice(b"\r\n\r\n");
        bytes.extend_from_slice(&self.body);
        bytes
    }

    /// Status line and header lines, without the terminating blank line
    fn format_head(&self) -> String {
        let mut head = format!("HTTP/1.1 {} {}{CRLF}", self.status, self.reason);
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join(CRLF);
        head.push_str(&headers);
        if !self.cookies.is_empty() {
            head.push_str(CRLF);
            head.push_str(&self.cookies.serialize());
        }
        head
    }

    fn insert_header(&mut self, name: String, value: String) {
        let existing = self
            .headers
            .keys()
            .position(|k| k.eq_ignore_ascii_case(&name));
        match existing {
            Some(idx) => self.headers[idx] = value,
            None => {
                self.headers.insert(name, value);
            }
        }
    }
}

/// Textual form for logging, framed like [`Response::serialize`]
impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{CRLF}{CRLF}{}", self.format_head(), self.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(response: &Response) -> String {
        String::from_utf8(response.serialize()).unwrap()
    }

    #[test]
    fn test_default_headers() {
        let response = Response::new();
        let names: Vec<_> = response.headers().keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["Server", "Date", "Content-Type", "Content-Length", "Connection"]
        );
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.header("server"), Some("BOSS"));
        assert_eq!(response.header("Content-Type"), Some("text/html"));
        assert_eq!(response.header("Content-Length"), Some("0"));
        assert!(response.keep_alive());
    }

    #[test]
    fn test_status_line_for_every_code() {
        for code in status::codes() {
            let mut response = Response::new();
            response.status(code).unwrap();
            let expected = format!(
                "HTTP/1.1 {code} {}\r\n",
                status::reason_for(code).unwrap()
            );
            assert!(text(&response).starts_with(&expected));
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        let mut response = Response::new();
        assert!(matches!(response.status(999), Err(Error::UnknownStatus(999))));
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.reason(), "OK");
    }

    #[test]
    fn test_content_length_counts_bytes() {
        let mut response = Response::new();
        response.body("héllo wörld ✓");
        assert_eq!(response.header("Content-Length"), Some("17"));
        assert_eq!(response.body_bytes().len(), 17);
    }

    #[test]
    fn test_json_body() {
        let mut response = Response::new();
        response.json(&json!({"len_check": "hello"})).unwrap();
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.body_text(), r#"{"len_check":"hello"}"#);
        assert_eq!(response.header("Content-Length"), Some("21"));
    }

    #[test]
    fn test_serialize_layout() {
        let mut response = Response::new();
        response
            .set_headers([("Date", "Thu, 01 Jan 1970 00:00:00 GMT")])
            .body("hi");
        assert_eq!(
            text(&response),
            "HTTP/1.1 200 OK\r\n\
             Server: BOSS\r\n\
             Date: Thu, 01 Jan 1970 00:00:00 GMT\r\n\
             Content-Type: text/html\r\n\
             Content-Length: 2\r\n\
             Connection: keep-alive\r\n\
             \r\n\
             hi"
        );
    }

    #[test]
    fn test_cookies_after_headers() {
        let mut response = Response::new();
        response
            .set_cookie("a", "1", &CookieOptions::default())
            .set_cookie("b", "2", &CookieOptions::new().cross_site());
        let text = text(&response);
        assert!(text.contains(
            "Connection: keep-alive\r\n\
             Set-Cookie: a=1; Path=/; SameSite=Lax\r\n\
             Set-Cookie: b=2; Path=/; SameSite=None; Secure\r\n\r\n"
        ));
    }

    #[test]
    fn test_no_cookie_lines_when_empty() {
        assert!(!text(&Response::new()).contains("Set-Cookie"));
    }

    #[test]
    fn test_header_merge_case_insensitive() {
        let mut response = Response::new();
        response.set_headers([("content-type", "text/plain"), ("X-Extra", "1")]);
        assert_eq!(response.headers().len(), 6);
        assert_eq!(response.headers()["Content-Type"], "text/plain");
        let last = response
            .headers()
            .get_index(5)
            .map(|(k, v)| (k.as_str(), v.as_str()));
        assert_eq!(last, Some(("X-Extra", "1")));
    }

    #[test]
    fn test_close_connection() {
        let mut response = Response::new();
        response.close_connection();
        assert_eq!(response.header("Connection"), Some("close"));
        assert!(!response.keep_alive());
    }

    #[test]
    fn test_idempotent_mutations() {
        let mut response = Response::new();
        response.body("same");
        let first = response.serialize();
        response.set_headers(Vec::<(String, String)>::new()).body("same");
        assert_eq!(response.serialize(), first);
    }

    #[test]
    fn test_with_config() {
        let config = HttpConfig {
            server_name: "edge".to_string(),
            default_content_type: "text/plain".to_string(),
            keep_alive: false,
            ..HttpConfig::default()
        };
        let response = Response::with_config(&config);
        assert_eq!(response.header("Server"), Some("edge"));
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert!(!response.keep_alive());
    }

    #[test]
    fn test_with_body() {
        let response = Response::with_body("abc");
        assert_eq!(response.header("Content-Length"), Some("3"));
        assert_eq!(response.body_bytes(), b"abc");
    }

    #[test]
    fn test_canned_and_error_responses() {
        let response = Response::canned(404).unwrap();
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.body_text(), "404 Not Found");
        assert!(Response::canned(999).is_err());

        let err = Error::MalformedRequest("empty request line".to_string());
        let response = Response::error_for(&err);
        assert_eq!(response.status_code(), 400);
        assert!(response.body_text().starts_with("400 Bad Request: malformed request"));
        assert!(!response.keep_alive());
    }

    #[test]
    fn test_display_matches_wire_form() {
        let mut response = Response::new();
        response.body("text");
        assert_eq!(response.to_string().into_bytes(), response.serialize());
    }
}
