//! HTTP/1.1 message objects for hand-rolled servers
//!
//! Two pipelines sharing a cookie helper:
//! - [`Request::parse`] turns the complete raw text of a request into a
//!   queryable [`Request`] (method, path, headers, query, cookies, body)
//! - [`Response`] collects status, headers, cookies and body and
//!   [`Response::serialize`]s them to the bytes written back to the peer
//!
//! Socket handling, keep-alive scheduling and routing live outside this
//! crate; the bundled binary shows one way to wire them up.

pub mod config;
pub mod cookie;
pub mod error;
pub mod http;
pub mod logger;
pub mod request;
pub mod response;

pub use cookie::{CookieJar, CookieOptions, SameSite};
pub use error::{Error, Result};
pub use request::{Body, Request};
pub use response::Response;
