//! Status code registry
//!
//! Closed, process-wide table mapping status codes to reason phrases.
//! The table is a constant, so concurrent reads need no synchronization.

use crate::error::{Error, Result};

/// Supported status codes, sorted by code
const STATUS_REASONS: &[(u16, &str)] = &[
    (100, "Continue"),
    (101, "Switching Protocols"),
    (102, "Processing"),
    (103, "Early Hints"), // RFC 8297
    (200, "OK"),
    (201, "Created"),
    (202, "Accepted"),
    (203, "Non Authoritative Information"),
    (204, "No Content"),
    (205, "Reset Content"),
    (206, "Partial Content"),
    (207, "Multi Status"),
    (208, "Already Reported"), // RFC 5842
    (226, "IM Used"),          // RFC 3229
    (300, "Multiple Choices"),
    (301, "Moved Permanently"),
    (302, "Found"),
    (303, "See Other"),
    (304, "Not Modified"),
    (305, "Use Proxy"),
    (306, "Switch Proxy"), // unused
    (307, "Temporary Redirect"),
    (308, "Permanent Redirect"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (402, "Payment Required"), // unused
    (403, "Forbidden"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (406, "Not Acceptable"),
    (407, "Proxy Authentication Required"),
    (408, "Request Timeout"),
    (409, "Conflict"),
    (410, "Gone"),
    (411, "Length Required"),
    (412, "Precondition Failed"),
    (413, "Request Entity Too Large"),
    (414, "Request URI Too Long"),
    (415, "Unsupported Media Type"),
    (416, "Requested Range Not Satisfiable"),
    (417, "Expectation Failed"),
    (418, "I'm a teapot"),        // RFC 2324
    (421, "Misdirected Request"), // RFC 7540
    (422, "Unprocessable Entity"),
    (423, "Locked"),
    (424, "Failed Dependency"),
    (425, "Too Early"), // RFC 8470
    (426, "Upgrade Required"),
    (428, "Precondition Required"), // RFC 6585
    (429, "Too Many Requests"),
    (431, "Request Header Fields Too Large"),
    (449, "Retry With"), // Microsoft extension
    (451, "Unavailable For Legal Reasons"),
    (500, "Internal Server Error"),
    (501, "Not Implemented"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Timeout"),
    (505, "HTTP Version Not Supported"),
    (506, "Variant Also Negotiates"), // RFC 2295
    (507, "Insufficient Storage"),
    (508, "Loop Detected"), // RFC 5842
    (510, "Not Extended"),
    (511, "Network Authentication Failed"),
];

/// Look up the reason phrase for a status code
///
/// # Examples
/// ```
/// use rawhttp::http::status::reason_for;
/// assert_eq!(reason_for(404).unwrap(), "Not Found");
/// assert!(reason_for(999).is_err());
/// ```
pub fn reason_for(code: u16) -> Result<&'static str> {
    STATUS_REASONS
        .binary_search_by_key(&code, |&(c, _)| c)
        .map(|idx| STATUS_REASONS[idx].1)
        .map_err(|_| Error::UnknownStatus(code))
}

/// Check whether a status code is in the registry
pub fn is_known(code: u16) -> bool {
    reason_for(code).is_ok()
}

/// Iterate over every registered status code in ascending order
pub fn codes() -> impl Iterator<Item = u16> {
    STATUS_REASONS.iter().map(|&(code, _)| code)
}
