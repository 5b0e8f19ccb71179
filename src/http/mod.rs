//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by the request parser and the
//! response builder.

pub mod date;
pub mod mime;
pub mod scan;
pub mod status;

// Re-export commonly used items
pub use mime::{body_format, BodyFormat};
pub use status::reason_for;
