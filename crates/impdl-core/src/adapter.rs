//! Client reply -> pipeline `Response`.

use std::sync::Arc;
use thiserror::Error;

use crate::client::RawResponse;
use crate::http::{responsetypes, Headers, Request, Response};

/// Flag carried by every response fetched through the impersonating path.
pub const IMPERSONATE_FLAG: &str = "impersonate";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("client reported invalid HTTP status {0}")]
    InvalidStatus(u16),
}

/// Build the response for an impersonated request.
///
/// The client already decoded the body, so `Content-Encoding` is dropped to
/// keep downstream consumers from decoding it a second time.
pub fn adapt(raw: RawResponse, request: Arc<Request>) -> Result<Response, AdapterError> {
    let response = assemble(raw, request, true)?;
    Ok(response.with_flag(IMPERSONATE_FLAG))
}

/// Same mapping for the plain path: headers untouched, no flag.
pub fn adapt_plain(raw: RawResponse, request: Arc<Request>) -> Result<Response, AdapterError> {
    assemble(raw, request, false)
}

fn assemble(
    raw: RawResponse,
    request: Arc<Request>,
    strip_encoding: bool,
) -> Result<Response, AdapterError> {
    if !(100..=999).contains(&raw.status) {
        return Err(AdapterError::InvalidStatus(raw.status));
    }

    let mut headers: Headers = raw.headers.into_iter().collect();
    if strip_encoding {
        headers.remove("Content-Encoding");
    }

    let url = if raw.url.is_empty() {
        request.url.clone()
    } else {
        raw.url
    };
    let kind = responsetypes::from_args(&headers, &url, &raw.body);

    Ok(Response::new(url, raw.status, headers, raw.body, kind).with_request(request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ResponseKind;

    fn raw(status: u16, headers: &[(&str, &str)], body: &[u8], url: &str) -> RawResponse {
        RawResponse {
            status,
            headers: headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            body: body.to_vec(),
            url: url.to_string(),
        }
    }

    #[test]
    fn strips_content_encoding_and_keeps_decoded_body() {
        let req = Arc::new(Request::new("https://example.com/"));
        let r = adapt(
            raw(
                200,
                &[("Content-Type", "text/plain"), ("Content-Encoding", "gzip"), ("Content-Length", "31")],
                b"already decoded",
                "https://example.com/",
            ),
            req,
        )
        .unwrap();
        assert!(!r.headers.contains("Content-Encoding"));
        assert_eq!(r.headers.get("Content-Length"), Some("31"));
        assert_eq!(r.body, b"already decoded");
        assert_eq!(r.kind, ResponseKind::Text);
    }

    #[test]
    fn repeated_headers_stay_repeated() {
        let req = Arc::new(Request::new("https://example.com/"));
        let r = adapt(
            raw(200, &[("Set-Cookie", "a=1"), ("Set-Cookie", "b=2")], b"", "https://example.com/"),
            req,
        )
        .unwrap();
        assert_eq!(r.headers.get_all("set-cookie").collect::<Vec<_>>(), vec!["a=1", "b=2"]);
    }

    #[test]
    fn scenario_fields() {
        let req = Arc::new(Request::new("https://example.com").with_meta("impersonate", "chrome120"));
        let r = adapt(
            raw(200, &[("Content-Type", "text/html")], b"<html></html>", "https://example.com"),
            Arc::clone(&req),
        )
        .unwrap();
        assert_eq!(r.status, 200);
        assert_eq!(r.flags, vec!["impersonate".to_string()]);
        assert_eq!(r.body, b"<html></html>");
        assert_eq!(r.url, "https://example.com");
        assert_eq!(r.kind, ResponseKind::Html);
        assert!(Arc::ptr_eq(r.request().unwrap(), &req));
    }

    #[test]
    fn status_is_verbatim_and_missing_url_falls_back() {
        let req = Arc::new(Request::new("https://example.com/a"));
        let r = adapt(raw(418, &[], b"", ""), req).unwrap();
        assert_eq!(r.status, 418);
        assert_eq!(r.url, "https://example.com/a");
    }

    #[test]
    fn invalid_status_is_an_error() {
        let req = Arc::new(Request::new("https://example.com/"));
        assert_eq!(
            adapt(raw(0, &[], b"", ""), req).unwrap_err(),
            AdapterError::InvalidStatus(0)
        );
    }

    #[test]
    fn plain_keeps_encoding_and_has_no_flag() {
        let req = Arc::new(Request::new("https://example.com/"));
        let r = adapt_plain(
            raw(200, &[("Content-Type", "text/html"), ("Content-Encoding", "gzip")], &[0x1f, 0x8b], ""),
            req,
        )
        .unwrap();
        assert_eq!(r.headers.get("Content-Encoding"), Some("gzip"));
        assert!(r.flags.is_empty());
        assert_eq!(r.kind, ResponseKind::Binary);
    }
}
