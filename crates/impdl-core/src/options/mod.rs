//! Option translators: request metadata -> client construction options and
//! per-call options.
//!
//! Both translators are pure functions of the request and the immutable
//! handler settings, so deriving them twice yields equal values.

mod args;
mod call;
mod client;
mod error;

pub use call::{call_options, CallOptions};
pub use client::{client_options, plain_client_options, ClientOptions, HttpVersionPref};
pub use error::OptionsError;

use serde_json::Value;

use crate::http::Meta;

/// Profile id (string) or `true` for the configured default profile.
pub const IMPERSONATE: &str = "impersonate";
/// Object of explicit client/call arguments overriding the bare metadata.
pub const IMPERSONATE_ARGS: &str = "impersonate_args";
pub const PROXY: &str = "proxy";
pub const DOWNLOAD_TIMEOUT: &str = "download_timeout";
pub const VERIFY: &str = "verify";
/// Local address to bind: a string, or a `[host, port]` pair.
pub const BINDADDRESS: &str = "bindaddress";

/// Whether the request asks for the impersonating path.
///
/// A truthy `impersonate` entry or any non-null `impersonate_args` entry.
pub fn wants_impersonation(meta: &Meta) -> bool {
    meta.get(IMPERSONATE).is_some_and(is_truthy)
        || meta.get(IMPERSONATE_ARGS).is_some_and(|v| !v.is_null())
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

pub(crate) fn meta_str(meta: &Meta, key: &str) -> Result<Option<String>, OptionsError> {
    match meta.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(OptionsError::invalid(key, "a string")),
    }
}

pub(crate) fn meta_bool(meta: &Meta, key: &str) -> Result<Option<bool>, OptionsError> {
    match meta.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(OptionsError::invalid(key, "a boolean")),
    }
}
