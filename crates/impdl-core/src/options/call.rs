use std::time::Duration;

use super::args::{parse_timeout, ImpersonateArgs};
use super::{OptionsError, DOWNLOAD_TIMEOUT};
use crate::config::HandlerSettings;
use crate::http::Request;

/// Options for the single call a session makes.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOptions {
    pub method: String,
    pub url: String,
    /// One entry per header name, repeated values folded.
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub cookies: Vec<(String, String)>,
    pub timeout: Duration,
    /// Always `false`: redirects are left to the crawl pipeline.
    pub allow_redirects: bool,
}

/// Derive call options from a request.
pub fn call_options(
    request: &Request,
    settings: &HandlerSettings,
) -> Result<CallOptions, OptionsError> {
    let args = ImpersonateArgs::from_meta(&request.meta)?;

    validate_url(&request.url)?;
    let method = request.method.trim().to_ascii_uppercase();
    if method.is_empty() || !method.bytes().all(|b| b.is_ascii_alphabetic() || b == b'-') {
        return Err(OptionsError::InvalidMethod(request.method.clone()));
    }

    let mut headers = request.headers.clone();
    for (name, value) in args.headers {
        headers.insert(name, value);
    }
    let headers = headers.folded();

    let mut cookies = request.cookies.clone();
    for (name, value) in args.cookies {
        upsert(&mut cookies, name, value);
    }

    let timeout = match args.timeout {
        Some(t) => t,
        None => match request.meta.get(DOWNLOAD_TIMEOUT) {
            Some(v) if !v.is_null() => parse_timeout(v, DOWNLOAD_TIMEOUT)?,
            _ => settings.download_timeout,
        },
    };

    Ok(CallOptions {
        method,
        url: request.url.clone(),
        headers,
        body: (!request.body.is_empty()).then(|| request.body.clone()),
        cookies,
        timeout,
        allow_redirects: false,
    })
}

fn validate_url(raw: &str) -> Result<(), OptionsError> {
    let invalid = |reason: &str| OptionsError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };
    if raw.trim().is_empty() {
        return Err(invalid("empty URL"));
    }
    let parsed = url::Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(&format!("unsupported scheme {:?}", other))),
    }
}

fn upsert(pairs: &mut Vec<(String, String)>, name: String, value: String) {
    match pairs.iter_mut().find(|(n, _)| *n == name) {
        Some(entry) => entry.1 = value,
        None => pairs.push((name, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings() -> HandlerSettings {
        HandlerSettings::default()
    }

    #[test]
    fn maps_request_fields() {
        let r = Request::new("https://example.com/search?q=1")
            .with_method("post")
            .with_header("Accept", "text/html")
            .with_header("accept", "application/json")
            .with_header("X-One", "1")
            .with_body("a=b")
            .with_cookie("sid", "s1")
            .with_meta("impersonate", "chrome120");
        let c = call_options(&r, &settings()).unwrap();
        assert_eq!(c.method, "POST");
        assert_eq!(c.url, "https://example.com/search?q=1");
        assert_eq!(
            c.headers,
            vec![
                ("Accept".to_string(), "text/html, application/json".to_string()),
                ("X-One".to_string(), "1".to_string()),
            ]
        );
        assert_eq!(c.body.as_deref(), Some(&b"a=b"[..]));
        assert_eq!(c.cookies, vec![("sid".to_string(), "s1".to_string())]);
        assert_eq!(c.timeout, Duration::from_secs(180));
        assert!(!c.allow_redirects);
    }

    #[test]
    fn empty_body_is_absent() {
        let c = call_options(&Request::new("http://localhost/"), &settings()).unwrap();
        assert!(c.body.is_none());
        assert_eq!(c.method, "GET");
    }

    #[test]
    fn timeout_precedence() {
        let r = Request::new("http://localhost/").with_meta("download_timeout", 12);
        assert_eq!(call_options(&r, &settings()).unwrap().timeout, Duration::from_secs(12));

        let r = r.with_meta("impersonate_args", json!({"timeout": 0.5}));
        assert_eq!(call_options(&r, &settings()).unwrap().timeout, Duration::from_millis(500));

        let r = Request::new("http://localhost/").with_meta("download_timeout", 0);
        assert_eq!(call_options(&r, &settings()).unwrap_err(), OptionsError::InvalidTimeout(0.0));
    }

    #[test]
    fn args_header_replaces_every_repeated_value() {
        let r = Request::new("http://localhost/")
            .with_header("X-Tag", "a")
            .with_header("Accept", "*/*")
            .with_header("x-tag", "b")
            .with_meta("impersonate_args", json!({"headers": {"X-TAG": "c"}}));
        let c = call_options(&r, &settings()).unwrap();
        assert_eq!(
            c.headers,
            vec![
                ("X-Tag".to_string(), "c".to_string()),
                ("Accept".to_string(), "*/*".to_string()),
            ]
        );
    }

    #[test]
    fn oversized_timeouts_are_errors() {
        let r = Request::new("http://localhost/").with_meta("download_timeout", 1e20);
        assert_eq!(call_options(&r, &settings()).unwrap_err(), OptionsError::InvalidTimeout(1e20));

        let r = Request::new("http://localhost/").with_meta("impersonate_args", json!({"timeout": 1e20}));
        assert_eq!(call_options(&r, &settings()).unwrap_err(), OptionsError::InvalidTimeout(1e20));
    }

    #[test]
    fn args_headers_and_cookies_override() {
        let r = Request::new("http://localhost/")
            .with_header("User-Agent", "mine")
            .with_cookie("sid", "old")
            .with_meta(
                "impersonate_args",
                json!({"headers": {"user-agent": "theirs", "X-New": "n"}, "cookies": {"sid": "new", "lang": "en"}}),
            );
        let c = call_options(&r, &settings()).unwrap();
        assert_eq!(
            c.headers,
            vec![
                ("User-Agent".to_string(), "theirs".to_string()),
                ("X-New".to_string(), "n".to_string()),
            ]
        );
        assert_eq!(
            c.cookies,
            vec![
                ("sid".to_string(), "new".to_string()),
                ("lang".to_string(), "en".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_url_and_method_fail() {
        let err = call_options(&Request::new(""), &settings()).unwrap_err();
        assert!(matches!(err, OptionsError::InvalidUrl { .. }));
        let err = call_options(&Request::new("/relative/path"), &settings()).unwrap_err();
        assert!(matches!(err, OptionsError::InvalidUrl { .. }));
        let err = call_options(&Request::new("ftp://example.com/f"), &settings()).unwrap_err();
        assert!(matches!(err, OptionsError::InvalidUrl { .. }));
        let err = call_options(&Request::new("http://x/").with_method("GE T"), &settings()).unwrap_err();
        assert_eq!(err, OptionsError::InvalidMethod("GE T".to_string()));
    }

    #[test]
    fn derivation_is_idempotent() {
        let r = Request::new("https://example.com")
            .with_header("Accept", "*/*")
            .with_meta("impersonate", "chrome120")
            .with_meta("impersonate_args", json!({"timeout": 3, "headers": {"X": "y"}}));
        let s = settings();
        assert_eq!(call_options(&r, &s).unwrap(), call_options(&r, &s).unwrap());
        assert_eq!(
            super::super::client_options(&r, &s).unwrap(),
            super::super::client_options(&r, &s).unwrap()
        );
    }
}
