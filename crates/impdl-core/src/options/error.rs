use thiserror::Error;

use crate::profile::UnknownProfile;

/// Malformed request data found while deriving client or call options.
///
/// Raised before any network I/O; the handler propagates it unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    #[error(transparent)]
    UnknownProfile(#[from] UnknownProfile),
    #[error("meta key {key:?} must be {expected}")]
    InvalidMeta { key: String, expected: &'static str },
    #[error("impersonate_args: unsupported argument {0:?}")]
    UnknownArgument(String),
    #[error("invalid request URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid request method {0:?}")]
    InvalidMethod(String),
    #[error("timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(f64),
}

impl OptionsError {
    pub(crate) fn invalid(key: impl Into<String>, expected: &'static str) -> Self {
        OptionsError::InvalidMeta {
            key: key.into(),
            expected,
        }
    }
}
