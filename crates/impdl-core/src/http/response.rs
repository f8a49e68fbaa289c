use std::borrow::Cow;
use std::sync::Arc;

use super::{Headers, Request};

/// Non-standard status for a response synthesized from a transport failure.
pub const CONNECTION_ERROR_STATUS: u16 = 532;

/// Representation picked by the content classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Binary,
    Text,
    Html,
    Xml,
    Json,
}

impl ResponseKind {
    pub fn is_text(self) -> bool {
        !matches!(self, ResponseKind::Binary)
    }
}

/// Downloaded response handed back to the crawl pipeline.
#[derive(Debug, Clone)]
pub struct Response {
    pub url: String,
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
    pub flags: Vec<String>,
    pub kind: ResponseKind,
    request: Option<Arc<Request>>,
}

impl Response {
    pub fn new(
        url: impl Into<String>,
        status: u16,
        headers: Headers,
        body: Vec<u8>,
        kind: ResponseKind,
    ) -> Self {
        Self {
            url: url.into(),
            status,
            headers,
            body,
            flags: Vec::new(),
            kind,
            request: None,
        }
    }

    /// Text response with status 532 carrying a transport error message.
    pub fn connection_error(url: impl Into<String>, message: &str) -> Self {
        Self::new(
            url,
            CONNECTION_ERROR_STATUS,
            Headers::new(),
            message.as_bytes().to_vec(),
            ResponseKind::Text,
        )
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn with_request(mut self, request: Arc<Request>) -> Self {
        self.request = Some(request);
        self
    }

    /// The request this response answers, if attached.
    pub fn request(&self) -> Option<&Arc<Request>> {
        self.request.as_ref()
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Body decoded as UTF-8 (lossy) for textual kinds; `None` for binary.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.kind
            .is_text()
            .then(|| String::from_utf8_lossy(&self.body))
    }

    pub fn is_connection_error(&self) -> bool {
        self.status == CONNECTION_ERROR_STATUS
    }
}
