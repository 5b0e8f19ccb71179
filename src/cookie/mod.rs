//! Cookie module
//!
//! Both directions of cookie handling:
//! - outbound: [`CookieJar`] builds `Set-Cookie` header lines
//! - inbound: [`CookieJar::parse`] reads a request `Cookie` header

mod options;

pub use options::{CookieOptions, SameSite};

use indexmap::IndexMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::http::scan::split_first;

/// Outbound cookies of a response, in insertion order
///
/// Setting a name twice replaces the earlier line but keeps its position.
///
/// # Examples
/// ```
/// use rawhttp::cookie::{CookieJar, CookieOptions};
/// let mut jar = CookieJar::new();
/// jar.set("sid", "abc", &CookieOptions::new().http_only());
/// assert_eq!(
///     jar.get("sid").unwrap(),
///     "Set-Cookie: sid=abc; Path=/; HttpOnly; SameSite=Lax"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    /// name -> formatted `Set-Cookie` line
    lines: IndexMap<String, String>,
    /// name -> raw value
    values: IndexMap<String, String>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a cookie
    pub fn set(&mut self, name: &str, value: &str, options: &CookieOptions) -> &mut Self {
        let line = options::format_set_cookie(name, value, options);
        self.lines.insert(name.to_string(), line);
        self.values.insert(name.to_string(), value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// `Set-Cookie` line for `name`
    pub fn get(&self, name: &str) -> Result<&str> {
        self.lines
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::MissingCookie(name.to_string()))
    }

    /// Every cookie name with its `Set-Cookie` line
    pub const fn get_all(&self) -> &IndexMap<String, String> {
        &self.lines
    }

    /// All `Set-Cookie` lines joined by CRLF, without a trailing CRLF
    pub fn serialize(&self) -> String {
        self.lines
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\r\n")
    }

    /// The jar rendered as a request `Cookie` header value (`a=1; b=2`)
    pub fn request_header(&self) -> String {
        self.values
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Parse a request `Cookie` header value into name/value pairs
    ///
    /// A missing header yields an empty map. Pairs are split on `;`, trimmed
    /// and split on the first `=`; empty segments are skipped and a segment
    /// without `=` fails with [`Error::MalformedCookie`]. Values are kept
    /// as sent.
    ///
    /// # Examples
    /// ```
    /// use rawhttp::cookie::CookieJar;
    /// let cookies = CookieJar::parse(Some("a=1; b=2")).unwrap();
    /// assert_eq!(cookies["a"], "1");
    /// assert_eq!(cookies["b"], "2");
    /// assert!(CookieJar::parse(None).unwrap().is_empty());
    /// ```
    pub fn parse(raw: Option<&str>) -> Result<IndexMap<String, String>> {
        let mut cookies = IndexMap::new();
        let Some(raw) = raw else {
            return Ok(cookies);
        };

        for segment in raw.split(';').map(str::trim) {
            if segment.is_empty() {
                continue;
            }
            let (name, value) = split_first(segment, '=');
            let value = value.ok_or_else(|| Error::MalformedCookie(segment.to_string()))?;
            cookies.insert(name.trim().to_string(), value.trim().to_string());
        }

        Ok(cookies)
    }
}

impl fmt::Display for CookieJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}
