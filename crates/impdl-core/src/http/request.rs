use serde_json::Value;

use super::Headers;

/// Open-ended per-request metadata (mixed value types).
pub type Meta = serde_json::Map<String, Value>;

/// Outgoing crawl request. Download handlers only ever read it.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub url: String,
    pub method: String,
    pub headers: Headers,
    pub body: Vec<u8>,
    /// Cookies to send, as `(name, value)` pairs.
    pub cookies: Vec<(String, String)>,
    pub meta: Meta,
}

impl Request {
    /// GET request for `url` with no headers, body, cookies or metadata.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            headers: Headers::new(),
            body: Vec::new(),
            cookies: Vec::new(),
            meta: Meta::new(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }
}
