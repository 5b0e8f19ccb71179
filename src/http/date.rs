//! HTTP date formatting
//!
//! IMF-fixdate as used by the `Date` header and cookie `Expires` attribute.

use chrono::{DateTime, Utc};

const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a timestamp as an HTTP date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: &DateTime<Utc>) -> String {
    time.format(IMF_FIXDATE).to_string()
}

/// Current time as an HTTP date
pub fn now() -> String {
    format_http_date(&Utc::now())
}
