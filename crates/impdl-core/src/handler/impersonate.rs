//! Download handler that routes flagged requests through an impersonating
//! client session and everything else through the default handler.

use async_trait::async_trait;
use std::sync::Arc;

use super::{DownloadHandler, HandlerError, HttpDownloadHandler, Spider};
use crate::adapter::adapt;
use crate::client::{CurlClient, Session, SessionFactory};
use crate::config::{HandlerSettings, ImpdlConfig};
use crate::http::{Request, Response};
use crate::options::{call_options, client_options, wants_impersonation};

pub struct ImpersonateDownloadHandler<D = HttpDownloadHandler, F = CurlClient> {
    settings: HandlerSettings,
    default_handler: D,
    client: F,
}

impl ImpersonateDownloadHandler {
    /// Handler over libcurl, with the plain libcurl handler as fallback.
    pub fn from_config(cfg: &ImpdlConfig) -> anyhow::Result<Self> {
        let settings = cfg.handler_settings()?;
        let default_handler = HttpDownloadHandler::new(settings.clone());
        Ok(Self::with_parts(settings, default_handler, CurlClient))
    }
}

impl<D, F> ImpersonateDownloadHandler<D, F> {
    pub fn with_parts(settings: HandlerSettings, default_handler: D, client: F) -> Self {
        Self {
            settings,
            default_handler,
            client,
        }
    }

    pub fn settings(&self) -> &HandlerSettings {
        &self.settings
    }

    /// True if `request` takes the impersonating path.
    pub fn routes(&self, request: &Request) -> bool {
        wants_impersonation(&request.meta)
    }
}

impl<D, F: SessionFactory> ImpersonateDownloadHandler<D, F> {
    async fn download_impersonated(
        &self,
        request: Arc<Request>,
        spider: &Spider,
    ) -> Result<Response, HandlerError> {
        let client_opts = client_options(&request, &self.settings)?;
        // The session lives until the end of this scope on every path.
        let mut session = self.client.open(&client_opts);
        let call = call_options(&request, &self.settings)?;

        let reply = match session.request(&call).await {
            Ok(reply) => reply,
            Err(e) if e.is_timeout() => {
                tracing::warn!(
                    spider = %spider.name,
                    url = %request.url,
                    timeout = ?call.timeout,
                    "impersonated request timed out: {}",
                    e
                );
                return Ok(Response::connection_error(request.url.clone(), &e.to_string()));
            }
            Err(e) => {
                tracing::warn!(
                    spider = %spider.name,
                    url = %request.url,
                    kind = ?e.kind,
                    "impersonated request failed: {}",
                    e
                );
                return Ok(Response::connection_error(request.url.clone(), &e.to_string()));
            }
        };
        drop(session);

        Ok(adapt(reply, request)?)
    }
}

#[async_trait]
impl<D: DownloadHandler, F: SessionFactory> DownloadHandler for ImpersonateDownloadHandler<D, F> {
    async fn download_request(
        &self,
        request: Arc<Request>,
        spider: &Spider,
    ) -> Result<Response, HandlerError> {
        if self.routes(&request) {
            tracing::debug!(spider = %spider.name, url = %request.url, "impersonating");
            return self.download_impersonated(request, spider).await;
        }
        self.default_handler.download_request(request, spider).await
    }
}
