//! Crawl-pipeline request/response model.
//!
//! These are the types the download handlers consume and produce. The
//! handlers only read a `Request`; a `Response` is built once and handed
//! back to the caller.

mod headers;
mod request;
mod response;
pub mod responsetypes;

pub use headers::Headers;
pub use request::{Meta, Request};
pub use response::{Response, ResponseKind, CONNECTION_ERROR_STATUS};
