//! Content-Type classification module
//!
//! Decides how a request body is decoded based on its `Content-Type`.

/// How a request body is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// `key=value&...` pairs, values percent-decoded
    Form,
    /// JSON document
    Json,
    /// `multipart/form-data`, recognized but not decoded
    Multipart,
    /// Anything else, including a missing header
    Unsupported,
}

/// Extract the media-type essence (`type/subtype`) from a `Content-Type` value
///
/// Parameters such as `charset` are dropped and the result is lower-cased.
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Classify a `Content-Type` header value
///
/// # Examples
/// ```
/// use rawhttp::http::mime::{body_format, BodyFormat};
/// assert_eq!(body_format(Some("application/json")), BodyFormat::Json);
/// assert_eq!(body_format(Some("text/plain; charset=utf-8")), BodyFormat::Form);
/// assert_eq!(body_format(None), BodyFormat::Unsupported);
/// ```
pub fn body_format(content_type: Option<&str>) -> BodyFormat {
    let Some(content_type) = content_type else {
        return BodyFormat::Unsupported;
    };

    match essence(content_type).as_str() {
        // Both are decoded as url-encoded pairs
        "text/plain" | "application/x-www-form-urlencoded" => BodyFormat::Form,
        "application/json" => BodyFormat::Json,
        "multipart/form-data" => BodyFormat::Multipart,
        _ => BodyFormat::Unsupported,
    }
}
