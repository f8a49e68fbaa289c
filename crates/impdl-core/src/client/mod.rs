//! Client sessions that execute a single call.
//!
//! `SessionFactory::open` builds a session from `ClientOptions`; the
//! session performs exactly one `CallOptions` call and releases everything
//! it holds when dropped, whether the call finished, failed or the awaiting
//! future was cancelled.

mod curl;
mod error;

pub use self::curl::{CurlClient, CurlSession};
pub use error::{TransportError, TransportErrorKind};

use async_trait::async_trait;

use crate::options::{CallOptions, ClientOptions};

/// Reply as reported by the client, before adaptation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    /// Header lines in arrival order; repeated names stay repeated.
    pub headers: Vec<(String, String)>,
    /// Body after any transparent content decoding.
    pub body: Vec<u8>,
    /// Effective URL of the reply; empty if the client did not report one.
    pub url: String,
}

#[async_trait]
pub trait Session: Send {
    async fn request(&mut self, call: &CallOptions) -> Result<RawResponse, TransportError>;
}

pub trait SessionFactory: Send + Sync {
    type Session: Session;

    fn open(&self, options: &ClientOptions) -> Self::Session;
}
