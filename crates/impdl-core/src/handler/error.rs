use thiserror::Error;

use crate::adapter::AdapterError;
use crate::client::TransportError;
use crate::options::OptionsError;

#[derive(Debug, Error)]
pub enum HandlerError {
    /// Malformed request data; raised before any I/O.
    #[error("invalid request: {0}")]
    Options(#[from] OptionsError),
    #[error("unexpected reply: {0}")]
    Adapter(#[from] AdapterError),
    /// Transport failure on the plain path. The impersonating path turns
    /// these into 532 responses instead.
    #[error("download failed: {0}")]
    Download(#[source] TransportError),
}
