//! Response kind classification from headers, URL and body.
//!
//! Each step is consulted only while the previous ones left the kind at
//! `Binary`: `Content-Type`, then `Content-Disposition` filename, then the
//! URL path extension, then a sniff of the first bytes of the body.

use super::{Headers, ResponseKind};

const SNIFF_LEN: usize = 5000;

/// Pick the response kind for a reply.
pub fn from_args(headers: &Headers, url: &str, body: &[u8]) -> ResponseKind {
    let mut kind = from_headers(headers);
    if kind == ResponseKind::Binary && !url.is_empty() {
        kind = from_url(url);
    }
    if kind == ResponseKind::Binary && !body.is_empty() {
        kind = from_body(body);
    }
    kind
}

pub fn from_headers(headers: &Headers) -> ResponseKind {
    let mut kind = ResponseKind::Binary;
    if let Some(ct) = headers.get("Content-Type") {
        kind = from_content_type(ct, headers.get("Content-Encoding"));
    }
    if kind == ResponseKind::Binary {
        if let Some(cd) = headers.get("Content-Disposition") {
            kind = from_content_disposition(cd);
        }
    }
    kind
}

/// A still-encoded body is opaque bytes whatever its declared type.
pub fn from_content_type(content_type: &str, content_encoding: Option<&str>) -> ResponseKind {
    if content_encoding.is_some_and(|e| !e.trim().is_empty()) {
        return ResponseKind::Binary;
    }
    let mimetype = content_type.split(';').next().unwrap_or("").trim();
    from_mimetype(mimetype)
}

pub fn from_mimetype(mimetype: &str) -> ResponseKind {
    let m = mimetype.to_ascii_lowercase();
    match m.as_str() {
        "text/html" | "application/xhtml+xml" | "application/vnd.wap.xhtml+xml" => {
            ResponseKind::Html
        }
        "text/xml" | "application/xml" | "application/rss+xml" | "application/atom+xml"
        | "application/rdf+xml" => ResponseKind::Xml,
        "application/json" | "application/x-json" | "application/ld+json" => ResponseKind::Json,
        "application/javascript" | "application/x-javascript" | "application/ecmascript" => {
            ResponseKind::Text
        }
        "application/octet-stream" | "" => ResponseKind::Binary,
        _ if m.ends_with("+xml") => ResponseKind::Xml,
        _ if m.ends_with("+json") => ResponseKind::Json,
        _ if m.starts_with("text/") => ResponseKind::Text,
        _ => ResponseKind::Binary,
    }
}

pub fn from_content_disposition(value: &str) -> ResponseKind {
    let filename = value.split(';').map(str::trim).find_map(|part| {
        let (key, val) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("filename")
            .then(|| val.trim().trim_matches('"'))
    });
    match filename {
        Some(name) if !name.is_empty() => from_filename(name),
        _ => ResponseKind::Binary,
    }
}

pub fn from_filename(name: &str) -> ResponseKind {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return ResponseKind::Binary,
    };
    match ext.as_str() {
        "html" | "htm" | "xhtml" | "shtml" => ResponseKind::Html,
        "xml" | "rss" | "atom" | "rdf" | "xsl" => ResponseKind::Xml,
        "json" | "jsonld" => ResponseKind::Json,
        "txt" | "csv" | "js" | "css" | "md" => ResponseKind::Text,
        _ => ResponseKind::Binary,
    }
}

pub fn from_url(raw: &str) -> ResponseKind {
    let last_segment = match url::Url::parse(raw) {
        Ok(u) => u
            .path_segments()
            .and_then(|mut s| s.next_back().map(str::to_string))
            .unwrap_or_default(),
        Err(_) => raw.rsplit('/').next().unwrap_or("").to_string(),
    };
    if last_segment.is_empty() {
        return ResponseKind::Binary;
    }
    from_filename(&last_segment)
}

/// Sniff the start of the body; control bytes other than whitespace mean binary.
pub fn from_body(body: &[u8]) -> ResponseKind {
    let chunk = &body[..body.len().min(SNIFF_LEN)];
    let binary = chunk
        .iter()
        .any(|&b| b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0c));
    if binary {
        return ResponseKind::Binary;
    }
    let lower = chunk.to_ascii_lowercase();
    if contains(&lower, b"<html") || contains(&lower, b"<!doctype html") {
        return ResponseKind::Html;
    }
    if contains(&lower, b"<?xml") {
        return ResponseKind::Xml;
    }
    ResponseKind::Text
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
