//! Text scanning helpers
//!
//! All splitting in the parser goes through these functions. Each one splits
//! on the first occurrence of its delimiter only, so values that contain the
//! delimiter themselves (`a=b=c`, `Host: [::1]:80`) are kept intact.

use percent_encoding::percent_decode_str;

/// Blank line separating the head from the body
pub const HEAD_DELIMITER: &str = "\r\n\r\n";

/// Split `input` at the first `delim`
///
/// Returns the whole input and `None` when the delimiter is absent.
///
/// # Examples
/// ```
/// use rawhttp::http::scan::split_first;
/// assert_eq!(split_first("a=b=c", '='), ("a", Some("b=c")));
/// assert_eq!(split_first("abc", '='), ("abc", None));
/// ```
pub fn split_first(input: &str, delim: char) -> (&str, Option<&str>) {
    match input.find(delim) {
        Some(idx) => (&input[..idx], Some(&input[idx + delim.len_utf8()..])),
        None => (input, None),
    }
}

/// Split a raw message into head and body at the first blank line
///
/// Later blank lines belong to the body verbatim. A message without a blank
/// line is all head.
pub fn split_message(raw: &str) -> (&str, &str) {
    match raw.find(HEAD_DELIMITER) {
        Some(idx) => (&raw[..idx], &raw[idx + HEAD_DELIMITER.len()..]),
        None => (raw, ""),
    }
}

/// Iterate over the lines of a head section
///
/// Lines end in CRLF; a bare LF is tolerated and a trailing CR is stripped.
pub fn lines(head: &str) -> impl Iterator<Item = &str> {
    head.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Percent-decode a value, replacing invalid UTF-8 sequences
///
/// `+` is left alone; only `%XX` escapes are decoded.
pub fn percent_decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Iterate over `key=value` pairs separated by `&`
///
/// Keys are returned verbatim, values are percent-decoded. Empty segments
/// are skipped and a segment without `=` yields an empty value.
///
/// # Examples
/// ```
/// use rawhttp::http::scan::pairs;
/// let parsed: Vec<_> = pairs("a=1&b=2%2B2&c").collect();
/// assert_eq!(parsed, vec![
///     ("a".to_string(), "1".to_string()),
///     ("b".to_string(), "2+2".to_string()),
///     ("c".to_string(), String::new()),
/// ]);
/// ```
pub fn pairs(input: &str) -> impl Iterator<Item = (String, String)> + '_ {
    input
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = split_first(segment, '=');
            (key.to_string(), value.map(percent_decode).unwrap_or_default())
        })
}
