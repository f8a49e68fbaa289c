//! `impdl fetch` – download one URL through the impersonating handler.

use anyhow::{bail, Context, Result};
use impdl_core::config::ImpdlConfig;
use impdl_core::options::{DOWNLOAD_TIMEOUT, IMPERSONATE, PROXY, VERIFY};
use impdl_core::{DownloadHandler, ImpersonateDownloadHandler, Request, Response, Spider};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Parsed `fetch` arguments.
#[derive(Debug, Clone, Default)]
pub struct FetchArgs {
    pub url: String,
    pub impersonate: Option<String>,
    pub no_impersonate: bool,
    pub method: String,
    pub headers: Vec<String>,
    pub data: Option<String>,
    pub cookies: Vec<String>,
    pub proxy: Option<String>,
    pub insecure: bool,
    pub timeout: Option<f64>,
    pub include: bool,
    pub output: Option<PathBuf>,
}

pub async fn run_fetch(cfg: &ImpdlConfig, args: FetchArgs) -> Result<()> {
    let handler = ImpersonateDownloadHandler::from_config(cfg)?;
    let request = Arc::new(build_request(&args)?);
    let spider = Spider::new("impdl");

    let response = handler
        .download_request(Arc::clone(&request), &spider)
        .await
        .with_context(|| format!("fetching {}", request.url))?;
    tracing::info!(
        url = %response.url,
        status = response.status,
        bytes = response.body.len(),
        flags = ?response.flags,
        "fetched"
    );

    if response.is_connection_error() {
        bail!(
            "connection error for {}: {}",
            response.url,
            String::from_utf8_lossy(&response.body)
        );
    }

    let mut stdout = std::io::stdout().lock();
    if args.include {
        stdout.write_all(head(&response).as_bytes())?;
    }
    match &args.output {
        Some(path) => {
            std::fs::write(path, &response.body)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        None => stdout.write_all(&response.body)?,
    }
    stdout.flush()?;
    Ok(())
}

/// Turn CLI arguments into a request with the matching meta keys.
pub(crate) fn build_request(args: &FetchArgs) -> Result<Request> {
    let mut request = Request::new(args.url.clone()).with_method(args.method.clone());
    for raw in &args.headers {
        let (name, value) = split_header(raw)?;
        request = request.with_header(name, value);
    }
    for raw in &args.cookies {
        let (name, value) = raw
            .split_once('=')
            .with_context(|| format!("cookie {:?} is not name=value", raw))?;
        request = request.with_cookie(name.trim(), value.trim());
    }
    if let Some(data) = &args.data {
        request = request.with_body(data.as_bytes());
    }

    if !args.no_impersonate {
        request = match &args.impersonate {
            Some(profile) => request.with_meta(IMPERSONATE, profile.as_str()),
            None => request.with_meta(IMPERSONATE, true),
        };
    }
    if let Some(proxy) = &args.proxy {
        request = request.with_meta(PROXY, proxy.as_str());
    }
    if args.insecure {
        request = request.with_meta(VERIFY, false);
    }
    if let Some(secs) = args.timeout {
        request = request.with_meta(DOWNLOAD_TIMEOUT, secs);
    }
    Ok(request)
}

fn split_header(raw: &str) -> Result<(&str, &str)> {
    let (name, value) = raw
        .split_once(':')
        .with_context(|| format!("header {:?} is not `Name: value`", raw))?;
    let name = name.trim();
    if name.is_empty() {
        bail!("header {:?} has an empty name", raw);
    }
    Ok((name, value.trim()))
}

fn head(response: &Response) -> String {
    let mut out = format!("HTTP {}\r\n", response.status);
    for (name, value) in response.headers.iter() {
        out.push_str(&format!("{}: {}\r\n", name, value));
    }
    out.push_str("\r\n");
    out
}
