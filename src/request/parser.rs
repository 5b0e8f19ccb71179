//! Request parsing
//!
//! Pipeline, in order: message split, request line, headers, cookies,
//! query string, body.

use indexmap::IndexMap;
use std::collections::HashMap;

use super::{Body, Request};
use crate::cookie::CookieJar;
use crate::error::{Error, Result};
use crate::http::mime::{self, BodyFormat};
use crate::http::scan::{self, split_first};
use crate::logger;

/// Synthetic header key holding the port taken from `Host`
pub const SERVER_PORT: &str = "SERVER_PORT";

/// Normalize a header name: upper-case, `-` replaced by `_`
///
/// # Examples
/// ```
/// use rawhttp::request::normalize_header_name;
/// assert_eq!(normalize_header_name("Content-Type"), "CONTENT_TYPE");
/// ```
pub fn normalize_header_name(name: &str) -> String {
    name.trim().replace('-', "_").to_ascii_uppercase()
}

pub(super) fn parse(raw: &str) -> Result<Request> {
    let (head, raw_body) = scan::split_message(raw);
    let mut lines = scan::lines(head);

    let line = lines.next().unwrap_or_default();
    let (method, target, version) = parse_request_line(line)?;
    let (path, query_string) = split_first(target, '?');

    let header = parse_headers(lines);
    let cookies = CookieJar::parse(header.get("COOKIE").map(String::as_str))?;
    let query: IndexMap<String, String> = query_string
        .map(|q| scan::pairs(q).collect())
        .unwrap_or_default();
    let body = decode_body(header.get("CONTENT_TYPE").map(String::as_str), raw_body)?;

    Ok(Request {
        raw: raw.to_string(),
        line: line.to_string(),
        method: method.to_string(),
        path: path.to_string(),
        query_string: query_string.map(ToString::to_string),
        version: version.map(ToString::to_string),
        header,
        cookies,
        query,
        params: HashMap::new(),
        body,
        files: Vec::new(),
    })
}

/// Split the request line into method, target and optional version
fn parse_request_line(line: &str) -> Result<(&str, &str, Option<&str>)> {
    let mut tokens = line.split(' ');
    let method = tokens.next().filter(|t| !t.is_empty());
    let target = tokens.next().filter(|t| !t.is_empty());

    match (method, target) {
        (Some(method), Some(target)) => {
            let version = tokens.next().filter(|t| !t.is_empty());
            Ok((method, target, version))
        }
        _ => Err(Error::MalformedRequest(format!(
            "request line needs a method and a path: {line:?}"
        ))),
    }
}

/// Parse header lines into normalized keys
///
/// Empty lines and lines without `:` are skipped. Repeated headers keep the
/// last value.
fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> IndexMap<String, String> {
    let mut headers = IndexMap::new();

    for line in lines {
        let (name, Some(value)) = split_first(line, ':') else {
            continue;
        };
        let key = normalize_header_name(name);
        let value = value.trim();

        if key == "HOST" {
            let (host, port) = split_host_port(value);
            headers.insert(key, host.to_string());
            if let Some(port) = port.filter(|p| !p.is_empty()) {
                headers.insert(SERVER_PORT.to_string(), port.to_string());
            }
            continue;
        }

        headers.insert(key, value.to_string());
    }

    headers
}

/// Split a `Host` value into host and port, keeping IPv6 literals whole
fn split_host_port(value: &str) -> (&str, Option<&str>) {
    if value.starts_with('[') {
        if let Some(end) = value.find(']') {
            let (host, rest) = value.split_at(end + 1);
            return (host, rest.strip_prefix(':'));
        }
    }
    split_first(value, ':')
}

/// Decode the body according to the `Content-Type` header
fn decode_body(content_type: Option<&str>, raw: &str) -> Result<Body> {
    match mime::body_format(content_type) {
        BodyFormat::Form => Ok(Body::Form(scan::pairs(raw).collect())),
        BodyFormat::Json => serde_json::from_str(raw)
            .map(Body::Json)
            .map_err(Error::BodyDecode),
        BodyFormat::Multipart => {
            logger::log_warning(&format!(
                "multipart body ({} bytes) ignored: file uploads are not supported",
                raw.len()
            ));
            Ok(Body::Empty)
        }
        BodyFormat::Unsupported => Ok(Body::Empty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_request() {
        let request =
            Request::parse("GET /search?q=a%20b HTTP/1.1\r\nHost: ex.com:8080\r\n\r\n").unwrap();
        assert_eq!(request.method(), "GET");
        assert_eq!(request.path(), "/search");
        assert_eq!(request.line(), "GET /search?q=a%20b HTTP/1.1");
        assert_eq!(request.version(), Some("HTTP/1.1"));
        assert_eq!(request.query().len(), 1);
        assert_eq!(request.query()["q"], "a b");
        assert_eq!(request.headers()["HOST"], "ex.com");
        assert_eq!(request.headers()["SERVER_PORT"], "8080");
        assert!(request.body().is_empty());
        assert!(request.files().is_empty());
        assert!(request.params().is_empty());
    }

    #[test]
    fn test_single_token_request_line() {
        assert!(matches!(
            Request::parse("GET\r\n\r\n"),
            Err(Error::MalformedRequest(_))
        ));
        assert!(matches!(Request::parse(""), Err(Error::MalformedRequest(_))));
        assert!(matches!(
            Request::parse(" /\r\n\r\n"),
            Err(Error::MalformedRequest(_))
        ));
    }

    #[test]
    fn test_version_optional() {
        let request = Request::parse("GET /").unwrap();
        assert_eq!(request.path(), "/");
        assert_eq!(request.version(), None);
    }

    #[test]
    fn test_header_normalization() {
        let raw = "GET / HTTP/1.1\r\n\
                   Content-Type: text/html\r\n\
                   X-Forwarded-For:  10.0.0.1 \r\n\
                   X-Time: 12:30:00\r\n\
                   \r\n";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.headers()["CONTENT_TYPE"], "text/html");
        assert_eq!(request.headers()["X_FORWARDED_FOR"], "10.0.0.1");
        assert_eq!(request.headers()["X_TIME"], "12:30:00");
        assert_eq!(request.header("content-type"), Some("text/html"));
    }

    #[test]
    fn test_junk_header_lines_skipped() {
        let raw = "GET / HTTP/1.1\r\nno colon here\r\nAccept: */*\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("Accept"), Some("*/*"));
    }

    #[test]
    fn test_host_variants() {
        let request = Request::parse("GET / HTTP/1.1\r\nHost: ex.com\r\n\r\n").unwrap();
        assert_eq!(request.header("HOST"), Some("ex.com"));
        assert_eq!(request.header(SERVER_PORT), None);

        let request = Request::parse("GET / HTTP/1.1\r\nhost: [::1]:3000\r\n\r\n").unwrap();
        assert_eq!(request.header("HOST"), Some("[::1]"));
        assert_eq!(request.header(SERVER_PORT), Some("3000"));
    }

    #[test]
    fn test_cookies() {
        let raw = "GET / HTTP/1.1\r\nCookie: sid=abc; theme=dark\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.cookies().len(), 2);
        assert_eq!(request.cookie("sid"), Some("abc"));
        assert_eq!(request.cookie("theme"), Some("dark"));
    }

    #[test]
    fn test_malformed_cookie_aborts() {
        let raw = "GET / HTTP/1.1\r\nCookie: sid\r\n\r\n";
        assert!(matches!(Request::parse(raw), Err(Error::MalformedCookie(_))));
    }

    #[test]
    fn test_query_keys_not_decoded() {
        let request = Request::parse("GET /p?a%20b=c%20d&t=x=y&flag HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.query()["a%20b"], "c d");
        assert_eq!(request.query()["t"], "x=y");
        assert_eq!(request.query()["flag"], "");
        assert_eq!(request.query_string(), Some("a%20b=c%20d&t=x=y&flag"));
    }

    #[test]
    fn test_json_body() {
        let raw = "POST /api HTTP/1.1\r\nContent-Type: application/json\r\n\r\n{\"x\":1}";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.body(), &Body::Json(json!({"x": 1})));
    }

    #[test]
    fn test_json_scalar_body() {
        let raw = "POST /api HTTP/1.1\r\nContent-Type: application/json\r\n\r\n[1,2]";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.body().as_json(), Some(&json!([1, 2])));
        assert!(request.body().as_form().is_none());
    }

    #[test]
    fn test_invalid_json_body() {
        let raw = "POST /api HTTP/1.1\r\nContent-Type: application/json\r\n\r\n{bad";
        assert!(matches!(Request::parse(raw), Err(Error::BodyDecode(_))));
    }

    #[test]
    fn test_form_body() {
        let raw = "POST /f HTTP/1.1\r\n\
                   Content-Type: application/x-www-form-urlencoded\r\n\
                   \r\n\
                   a=1&b=2%2B2";
        let request = Request::parse(raw).unwrap();
        let form = request.body().as_form().unwrap();
        assert_eq!(form.len(), 2);
        assert_eq!(form["a"], "1");
        assert_eq!(form["b"], "2+2");
    }

    #[test]
    fn test_plain_text_body_as_form() {
        let raw = "POST /f HTTP/1.1\r\nContent-Type: text/plain\r\n\r\nmsg=hi%21";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.body().field("msg"), Some("hi!"));
    }

    #[test]
    fn test_repeated_delimiter_is_body_content() {
        let raw = "POST /f HTTP/1.1\r\nContent-Type: text/plain\r\n\r\na=1\r\n\r\nb=2";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.body().field("a"), Some("1\r\n\r\nb=2"));
    }

    #[test]
    fn test_unknown_content_type_body() {
        let raw = "POST /f HTTP/1.1\r\nContent-Type: text/html\r\n\r\n<p>hi</p>";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.body(), &Body::Empty);
    }

    #[test]
    fn test_multipart_not_decoded() {
        let raw = "POST /upload HTTP/1.1\r\n\
                   Content-Type: multipart/form-data; boundary=x\r\n\
                   \r\n\
                   --x--";
        let request = Request::parse(raw).unwrap();
        assert!(request.body().is_empty());
        assert!(request.files().is_empty());
    }

    #[test]
    fn test_params_writable() {
        let mut request = Request::parse("GET /users/42 HTTP/1.1\r\n\r\n").unwrap();
        request
            .params_mut()
            .insert("id".to_string(), "42".to_string());
        assert_eq!(request.param("id"), Some("42"));
    }

    #[test]
    fn test_raw_retained() {
        let raw = "GET / HTTP/1.1\r\nHost: ex.com\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.raw(), raw);
        assert_eq!(request.to_string(), raw);
    }

    #[test]
    fn test_from_bytes() {
        let request = Request::from_bytes(b"DELETE /x HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(request.method(), "DELETE");
        assert!(matches!(
            Request::from_bytes(b"GET /\xff HTTP/1.1\r\n\r\n"),
            Err(Error::MalformedRequest(_))
        ));
    }
}
