//! Cookie attributes

use chrono::{DateTime, Utc};
use std::fmt;

use crate::http::date::format_http_date;

/// `SameSite` cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    /// Cross-site cookie; always sent together with `Secure`
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        })
    }
}

/// Attributes of an outbound cookie
///
/// Defaults to `Path=/` and `SameSite=Lax`. Setting `same_site` to `None`
/// (or `Some(SameSite::None)`) makes the cookie cross-site, which forces
/// `Secure` on.
///
/// # Examples
/// ```
/// use rawhttp::cookie::{CookieOptions, SameSite};
/// let options = CookieOptions::new()
///     .max_age(3600)
///     .http_only()
///     .same_site(SameSite::Strict);
/// assert_eq!(options.path, "/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub max_age: Option<i64>,
    pub expires: Option<String>,
    pub domain: Option<String>,
    pub path: String,
    pub http_only: bool,
    pub same_site: Option<SameSite>,
    pub secure: bool,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            max_age: None,
            expires: None,
            domain: None,
            path: "/".to_string(),
            http_only: false,
            same_site: Some(SameSite::Lax),
            secure: false,
        }
    }
}

impl CookieOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Raw `Expires` value, written as given
    #[must_use]
    pub fn expires(mut self, expires: impl Into<String>) -> Self {
        self.expires = Some(expires.into());
        self
    }

    /// `Expires` from a timestamp, formatted as an HTTP date
    #[must_use]
    pub fn expires_at(self, time: &DateTime<Utc>) -> Self {
        self.expires(format_http_date(time))
    }

    #[must_use]
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub const fn http_only(mut self) -> Self {
        self.http_only = true;
        self
    }

    #[must_use]
    pub const fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    #[must_use]
    pub const fn same_site(mut self, mode: SameSite) -> Self {
        self.same_site = Some(mode);
        self
    }

    /// Drop the `SameSite` restriction (emits `SameSite=None; Secure`)
    #[must_use]
    pub const fn cross_site(mut self) -> Self {
        self.same_site = None;
        self
    }

    /// Whether the cookie ends up as `SameSite=None`
    pub const fn is_cross_site(&self) -> bool {
        matches!(self.same_site, None | Some(SameSite::None))
    }
}

/// Build a `Set-Cookie` header line
///
/// Attribute order is fixed: `Path`, `Max-Age`, `Expires`, `Domain`,
/// `HttpOnly`, `Secure`, `SameSite`. `Secure` is written at most once.
pub(crate) fn format_set_cookie(name: &str, value: &str, options: &CookieOptions) -> String {
    let mut line = format!("Set-Cookie: {name}={value}; Path={}", options.path);

    if let Some(max_age) = options.max_age {
        line.push_str(&format!("; Max-Age={max_age}"));
    }
    if let Some(expires) = non_empty(options.expires.as_deref()) {
        line.push_str(&format!("; Expires={expires}"));
    }
    if let Some(domain) = non_empty(options.domain.as_deref()) {
        line.push_str(&format!("; Domain={domain}"));
    }
    if options.http_only {
        line.push_str("; HttpOnly");
    }
    if options.secure {
        line.push_str("; Secure");
    }

    match options.same_site {
        Some(mode @ (SameSite::Strict | SameSite::Lax)) => {
            line.push_str(&format!("; SameSite={mode}"));
        }
        None | Some(SameSite::None) => {
            line.push_str("; SameSite=None");
            // Browsers reject cross-site cookies without Secure
            if !options.secure {
                line.push_str("; Secure");
            }
        }
    }

    line
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
