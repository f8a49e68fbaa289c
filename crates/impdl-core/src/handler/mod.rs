//! Download handlers: the dispatch point between the crawl pipeline and
//! the HTTP clients.

mod error;
mod http;
mod impersonate;

#[cfg(test)]
mod testing;

pub use error::HandlerError;
pub use http::HttpDownloadHandler;
pub use impersonate::ImpersonateDownloadHandler;

use async_trait::async_trait;
use std::sync::Arc;

use crate::http::{Request, Response};

/// The crawl context a request belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spider {
    pub name: String,
}

impl Spider {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
pub trait DownloadHandler: Send + Sync {
    async fn download_request(
        &self,
        request: Arc<Request>,
        spider: &Spider,
    ) -> Result<Response, HandlerError>;
}
