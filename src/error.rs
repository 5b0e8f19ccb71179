//! Error types
//!
//! Every failure in the request/response core is local and synchronous.
//! Callers (the transport or handler layer) map them to an HTTP response,
//! see [`Error::status_code`].

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Request parsing and response building errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request line is missing the method/path pair, or the input is not text
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Cookie pair without `=`
    #[error("malformed cookie pair: {0:?}")]
    MalformedCookie(String),

    /// Status code absent from the registry
    #[error("status code {0} is not supported")]
    UnknownStatus(u16),

    /// Cookie lookup by a name that was never set
    #[error("cookie {0:?} is not set")]
    MissingCookie(String),

    /// JSON request body failed to parse
    #[error("failed to decode JSON body: {0}")]
    BodyDecode(#[source] serde_json::Error),

    /// JSON response body failed to serialize
    #[error("failed to encode JSON body: {0}")]
    BodyEncode(#[source] serde_json::Error),
}

impl Error {
    /// Status code a caller should answer with when this error escapes a handler
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MalformedRequest(_) | Self::MalformedCookie(_) | Self::BodyDecode(_) => 400,
            Self::UnknownStatus(_) | Self::MissingCookie(_) | Self::BodyEncode(_) => 500,
        }
    }
}
