//! Default (non-impersonating) HTTP download handler.

use async_trait::async_trait;
use std::sync::Arc;

use super::{DownloadHandler, HandlerError, Spider};
use crate::adapter::adapt_plain;
use crate::client::{CurlClient, Session, SessionFactory};
use crate::config::HandlerSettings;
use crate::http::{Request, Response};
use crate::options::{call_options, plain_client_options};

/// Plain libcurl download: no fingerprint, no content decoding, transport
/// errors returned as errors.
pub struct HttpDownloadHandler<F = CurlClient> {
    settings: HandlerSettings,
    client: F,
}

impl HttpDownloadHandler {
    pub fn new(settings: HandlerSettings) -> Self {
        Self::with_client(settings, CurlClient)
    }
}

impl<F> HttpDownloadHandler<F> {
    pub fn with_client(settings: HandlerSettings, client: F) -> Self {
        Self { settings, client }
    }
}

#[async_trait]
impl<F: SessionFactory> DownloadHandler for HttpDownloadHandler<F> {
    async fn download_request(
        &self,
        request: Arc<Request>,
        spider: &Spider,
    ) -> Result<Response, HandlerError> {
        let client_opts = plain_client_options(&request, &self.settings)?;
        let call = call_options(&request, &self.settings)?;
        let mut session = self.client.open(&client_opts);
        let raw = session.request(&call).await.map_err(|e| {
            tracing::debug!(spider = %spider.name, url = %request.url, "download failed: {}", e);
            HandlerError::Download(e)
        })?;
        drop(session);
        Ok(adapt_plain(raw, request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RawResponse;
    use crate::handler::testing::{MockFactory, Script};

    #[tokio::test]
    async fn plain_download_keeps_encoding_and_has_no_flag() {
        let factory = MockFactory::new(Script::Reply(RawResponse {
            status: 200,
            headers: vec![("Content-Encoding".to_string(), "gzip".to_string())],
            body: vec![0x1f, 0x8b],
            url: "http://localhost/".to_string(),
        }));
        let counters = factory.counters.clone();
        let handler = HttpDownloadHandler::with_client(HandlerSettings::default(), factory);
        let req = Arc::new(Request::new("http://localhost/").with_meta("proxy", "http://p:1"));
        let r = handler.download_request(req, &Spider::new("s")).await.unwrap();
        assert_eq!(r.headers.get("Content-Encoding"), Some("gzip"));
        assert!(r.flags.is_empty());

        let calls = counters.calls();
        assert_eq!(calls.len(), 1);
        let (opts, call) = &calls[0];
        assert!(opts.impersonate.is_none());
        assert!(!opts.decode_content);
        assert_eq!(opts.proxy.as_deref(), Some("http://p:1"));
        assert!(!call.allow_redirects);
        assert_eq!(counters.closed(), 1);
    }

    #[tokio::test]
    async fn plain_transport_errors_propagate() {
        let factory = MockFactory::new(Script::Fail("Connection refused".to_string()));
        let handler = HttpDownloadHandler::with_client(HandlerSettings::default(), factory);
        let err = handler
            .download_request(Arc::new(Request::new("http://localhost/")), &Spider::default())
            .await
            .unwrap_err();
        match err {
            HandlerError::Download(e) => assert_eq!(e.message, "Connection refused"),
            other => panic!("expected Download, got {:?}", other),
        }
    }
}
