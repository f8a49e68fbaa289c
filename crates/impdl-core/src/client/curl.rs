//! libcurl-backed sessions.
//!
//! Each session owns the options for one `Easy` handle; the transfer runs
//! on the blocking pool. Dropping the session raises its abort token and
//! the progress callback stops any transfer still in flight.

use async_trait::async_trait;
use curl::easy::{Easy, HttpVersion, List, SslVersion};
use std::str;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{RawResponse, Session, SessionFactory, TransportError, TransportErrorKind};
use crate::options::{CallOptions, ClientOptions, HttpVersionPref};
use crate::profile::TlsVersion;

/// Opens a fresh libcurl session per request; holds no state itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlClient;

impl SessionFactory for CurlClient {
    type Session = CurlSession;

    fn open(&self, options: &ClientOptions) -> CurlSession {
        CurlSession::new(options.clone())
    }
}

pub struct CurlSession {
    options: ClientOptions,
    abort: Arc<AtomicBool>,
}

impl CurlSession {
    pub fn new(options: ClientOptions) -> Self {
        tracing::debug!(
            profile = options.impersonate.map(|p| p.as_str()).unwrap_or("none"),
            proxy = options.proxy.as_deref().unwrap_or("-"),
            verify = options.verify,
            "session opened"
        );
        Self {
            options,
            abort: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Drop for CurlSession {
    fn drop(&mut self) {
        self.abort.store(true, Ordering::Relaxed);
        tracing::trace!("session closed");
    }
}

#[async_trait]
impl Session for CurlSession {
    async fn request(&mut self, call: &CallOptions) -> Result<RawResponse, TransportError> {
        let options = self.options.clone();
        let call = call.clone();
        let abort = Arc::clone(&self.abort);
        tokio::task::spawn_blocking(move || perform(&options, &call, &abort))
            .await
            .map_err(|e| {
                TransportError::new(TransportErrorKind::Other, format!("transfer task failed: {}", e))
            })?
    }
}

fn perform(
    options: &ClientOptions,
    call: &CallOptions,
    abort: &AtomicBool,
) -> Result<RawResponse, TransportError> {
    if abort.load(Ordering::Relaxed) {
        return Err(TransportError::new(TransportErrorKind::Aborted, "session closed before transfer"));
    }

    let mut easy = Easy::new();
    configure_client(&mut easy, options)?;
    configure_call(&mut easy, options, call)?;

    let mut headers: Vec<(String, String)> = Vec::new();
    let mut body: Vec<u8> = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.header_function(|line| {
            collect_header_line(line, &mut headers);
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.progress_function(|_, _, _, _| !abort.load(Ordering::Relaxed))?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    let effective = easy.effective_url()?.map(str::to_string);
    let url = final_url(call, effective);

    Ok(RawResponse {
        status: u16::try_from(code).unwrap_or(0),
        headers,
        body,
        url,
    })
}

/// libcurl takes the timeout as a `long` of milliseconds.
const MAX_TIMEOUT: Duration = Duration::from_millis(i32::MAX as u64);

/// libcurl normalizes the effective URL (`http://host` -> `http://host/`).
/// Without redirects the reply is for the requested URL exactly as given.
fn final_url(call: &CallOptions, effective: Option<String>) -> String {
    if call.allow_redirects {
        effective.unwrap_or_default()
    } else {
        call.url.clone()
    }
}

fn configure_client(easy: &mut Easy, options: &ClientOptions) -> Result<(), curl::Error> {
    easy.signal(false)?;
    easy.progress(true)?;
    easy.max_connects(options.max_clients.max(1))?;

    if let Some(profile) = options.impersonate {
        let fp = profile.fingerprint();
        easy.ssl_cipher_list(fp.ciphers)?;
        easy.ssl_min_max_version(ssl_version(fp.min_tls), SslVersion::Tlsv13)?;
    }
    match options.http_version {
        Some(HttpVersionPref::Http1_1) => easy.http_version(HttpVersion::V11)?,
        Some(HttpVersionPref::Http2) => set_http2(easy),
        None if options.impersonate.is_some() => set_http2(easy),
        None => {}
    }

    if let Some(proxy) = &options.proxy {
        easy.proxy(proxy)?;
    }
    easy.ssl_verify_peer(options.verify)?;
    easy.ssl_verify_host(options.verify)?;
    if let Some(iface) = &options.interface {
        easy.interface(iface)?;
    }
    if options.decode_content {
        // Empty string: advertise and decode every encoding libcurl was built with.
        easy.accept_encoding("")?;
    }
    Ok(())
}

/// h2 needs libcurl built with nghttp2; without it the session stays on HTTP/1.1.
fn set_http2(easy: &mut Easy) {
    if let Err(e) = easy.http_version(HttpVersion::V2TLS) {
        tracing::debug!("HTTP/2 unavailable, using HTTP/1.1: {}", e);
    }
}

fn configure_call(easy: &mut Easy, options: &ClientOptions, call: &CallOptions) -> Result<(), curl::Error> {
    easy.url(&call.url)?;
    easy.follow_location(call.allow_redirects)?;
    easy.timeout(call.timeout.min(MAX_TIMEOUT))?;

    match (call.method.as_str(), &call.body) {
        ("GET", None) => easy.get(true)?,
        ("HEAD", None) => easy.nobody(true)?,
        ("POST", None) => easy.post_fields_copy(&[])?,
        (_, None) => easy.custom_request(&call.method)?,
        (method, Some(body)) => {
            easy.post_fields_copy(body)?;
            if method != "POST" {
                easy.custom_request(method)?;
            }
        }
    }

    let defaults = match options.impersonate {
        Some(profile) if options.default_headers => profile
            .fingerprint()
            .headers
            .into_iter()
            .filter(|(name, _)| !(options.decode_content && name.eq_ignore_ascii_case("accept-encoding")))
            .collect(),
        _ => Vec::new(),
    };
    let merged = merge_headers(defaults, &call.headers);

    let mut list = List::new();
    for line in header_lines(&merged) {
        list.append(&line)?;
    }
    if call.body.is_some() {
        // Browsers never send `Expect: 100-continue`.
        list.append("Expect:")?;
    }
    easy.http_headers(list)?;

    if !call.cookies.is_empty() {
        let cookie = call
            .cookies
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("; ");
        easy.cookie(&cookie)?;
    }
    Ok(())
}

fn ssl_version(v: TlsVersion) -> SslVersion {
    match v {
        TlsVersion::Tls10 => SslVersion::Tlsv10,
        TlsVersion::Tls12 => SslVersion::Tlsv12,
    }
}

/// Profile defaults in browser order; request headers replace a default of the
/// same name in place, the rest follow.
fn merge_headers(
    defaults: Vec<(String, String)>,
    overrides: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged = defaults;
    for (name, value) in overrides {
        match merged.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(entry) => *entry = (name.clone(), value.clone()),
            None => merged.push((name.clone(), value.clone())),
        }
    }
    merged
}

/// `Name: value` lines; libcurl needs `Name;` to send an empty value.
fn header_lines(headers: &[(String, String)]) -> Vec<String> {
    headers
        .iter()
        .map(|(name, value)| {
            if value.is_empty() {
                format!("{};", name.trim())
            } else {
                format!("{}: {}", name.trim(), value.trim())
            }
        })
        .collect()
}

/// A status line starts a new header block (e.g. after `100 Continue`).
fn collect_header_line(line: &[u8], headers: &mut Vec<(String, String)>) {
    let line = match str::from_utf8(line) {
        Ok(s) => s.trim_end(),
        Err(_) => return,
    };
    if line.starts_with("HTTP/") {
        headers.clear();
        return;
    }
    if let Some((name, value)) = line.split_once(':') {
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }
}
