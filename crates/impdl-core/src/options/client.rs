use serde_json::Value;

use super::args::ImpersonateArgs;
use super::{meta_bool, meta_str, OptionsError, BINDADDRESS, IMPERSONATE, PROXY, VERIFY};
use crate::config::HandlerSettings;
use crate::http::{Meta, Request};
use crate::profile::Profile;

/// Preferred HTTP version for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVersionPref {
    Http1_1,
    Http2,
}

impl HttpVersionPref {
    pub(crate) fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1.1" | "http/1.1" | "http1.1" => Some(HttpVersionPref::Http1_1),
                "2" | "2.0" | "http/2" | "h2" => Some(HttpVersionPref::Http2),
                _ => None,
            },
            Value::Number(n) => match n.as_f64() {
                Some(v) if (v - 1.1).abs() < f64::EPSILON => Some(HttpVersionPref::Http1_1),
                Some(v) if v == 2.0 => Some(HttpVersionPref::Http2),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Options used to construct the per-request client session.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    /// Browser to impersonate; `None` is a plain client.
    pub impersonate: Option<Profile>,
    pub proxy: Option<String>,
    pub verify: bool,
    /// Local interface or address for outgoing connections.
    pub interface: Option<String>,
    /// Send the profile's default browser headers.
    pub default_headers: bool,
    /// Overrides the profile's HTTP version.
    pub http_version: Option<HttpVersionPref>,
    /// Transparently decode compressed bodies.
    pub decode_content: bool,
    /// Connections the session may keep open at once.
    pub max_clients: u32,
}

impl ClientOptions {
    /// Non-impersonating client built from settings alone.
    pub fn plain(settings: &HandlerSettings) -> Self {
        Self {
            impersonate: None,
            proxy: settings.proxy.clone(),
            verify: settings.verify_tls,
            interface: settings.bind_address.clone(),
            default_headers: false,
            http_version: None,
            decode_content: false,
            max_clients: 1,
        }
    }
}

/// Derive session options for an impersonated request.
///
/// Precedence for every field: `impersonate_args`, then the bare metadata
/// key, then settings.
pub fn client_options(
    request: &Request,
    settings: &HandlerSettings,
) -> Result<ClientOptions, OptionsError> {
    let meta = &request.meta;
    let args = ImpersonateArgs::from_meta(meta)?;

    let profile = match args.impersonate {
        Some(p) => p,
        None => profile_from_meta(meta)?.unwrap_or(settings.default_profile),
    };
    let proxy = match args.proxy {
        Some(explicit) => explicit,
        None => meta_str(meta, PROXY)?.or_else(|| settings.proxy.clone()),
    };
    let verify = match args.verify {
        Some(v) => v,
        None => meta_bool(meta, VERIFY)?.unwrap_or(settings.verify_tls),
    };
    let interface = match args.interface {
        Some(i) => Some(i),
        None => bind_address(meta)?.or_else(|| settings.bind_address.clone()),
    };

    Ok(ClientOptions {
        impersonate: Some(profile),
        proxy,
        verify,
        interface,
        default_headers: args.default_headers.unwrap_or(settings.default_headers),
        http_version: args.http_version,
        decode_content: true,
        max_clients: 1,
    })
}

/// Session options for the plain path: settings, with the request's
/// `proxy`, `verify` and `bindaddress` metadata applied.
pub fn plain_client_options(
    request: &Request,
    settings: &HandlerSettings,
) -> Result<ClientOptions, OptionsError> {
    let meta = &request.meta;
    let mut opts = ClientOptions::plain(settings);
    if let Some(proxy) = meta_str(meta, PROXY)? {
        opts.proxy = Some(proxy);
    }
    if let Some(verify) = meta_bool(meta, VERIFY)? {
        opts.verify = verify;
    }
    if let Some(iface) = bind_address(meta)? {
        opts.interface = Some(iface);
    }
    Ok(opts)
}

/// `impersonate` as a profile id; `true`, `false`, empty or absent yield `None`.
fn profile_from_meta(meta: &Meta) -> Result<Option<Profile>, OptionsError> {
    match meta.get(IMPERSONATE) {
        None | Some(Value::Null) | Some(Value::Bool(_)) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.parse()?)),
        Some(_) => Err(OptionsError::invalid(IMPERSONATE, "a profile id or a boolean")),
    }
}

fn bind_address(meta: &Meta) -> Result<Option<String>, OptionsError> {
    match meta.get(BINDADDRESS) {
        Some(Value::Array(pair)) => match pair.first() {
            Some(Value::String(host)) if !host.is_empty() => Ok(Some(host.clone())),
            _ => Err(OptionsError::invalid(BINDADDRESS, "a host string or [host, port]")),
        },
        _ => meta_str(meta, BINDADDRESS),
    }
}
