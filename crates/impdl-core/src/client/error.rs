use thiserror::Error;

/// Coarse classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    /// DNS, refused/reset connection, proxy failures.
    Connect,
    Tls,
    /// Transfer stopped because its session was dropped.
    Aborted,
    Other,
}

/// Failure raised by a client while performing a call.
///
/// `Display` is the bare message; it becomes the body of the synthetic
/// connection-error response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }
}

impl From<curl::Error> for TransportError {
    fn from(e: curl::Error) -> Self {
        let kind = if e.is_operation_timedout() {
            TransportErrorKind::Timeout
        } else if e.is_aborted_by_callback() {
            TransportErrorKind::Aborted
        } else if e.is_couldnt_connect()
            || e.is_couldnt_resolve_host()
            || e.is_couldnt_resolve_proxy()
            || e.is_send_error()
            || e.is_recv_error()
            || e.is_got_nothing()
        {
            TransportErrorKind::Connect
        } else if e.is_ssl_connect_error()
            || e.is_peer_failed_verification()
            || e.is_ssl_cipher()
            || e.is_ssl_cacert()
        {
            TransportErrorKind::Tls
        } else {
            TransportErrorKind::Other
        };
        let message = match e.extra_description() {
            Some(extra) => extra.to_string(),
            None => e.description().to_string(),
        };
        TransportError::new(kind, message)
    }
}
