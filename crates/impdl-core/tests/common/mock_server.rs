//! Minimal HTTP/1.1 server for integration tests.
//!
//! Routes:
//! - `/`, `/html`: 200 text/html page
//! - `/gzip`: gzip-encoded HTML with `Content-Encoding: gzip`
//! - `/redirect`: 302 to `/html`
//! - `/echo`: 200 text/plain echoing the request head and body
//! - `/slow`: waits three seconds before answering

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

pub const HTML: &str = "<html><body>plain</body></html>";
pub const GZIP_PLAIN: &str = "<html><body>compressed</body></html>";

/// `GZIP_PLAIN` compressed with gzip (mtime 0).
pub const GZIP_BODY: &[u8] = &[
    0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x03, 0xb3, 0xc9, 0x28, 0xc9, 0xcd,
    0xb1, 0xb3, 0x49, 0xca, 0x4f, 0xa9, 0xb4, 0x4b, 0xce, 0xcf, 0x2d, 0x28, 0x4a, 0x2d, 0x2e,
    0x4e, 0x4d, 0xb1, 0xd1, 0x07, 0x0b, 0xd8, 0xe8, 0x83, 0x65, 0x01, 0x1a, 0x79, 0xda, 0x8f,
    0x24, 0x00, 0x00, 0x00,
];

/// Starts the server on a background thread and returns its base URL
/// without a trailing slash (e.g. "http://127.0.0.1:12345").
pub fn start() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            thread::spawn(move || handle(stream));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// A base URL nothing listens on.
pub fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let Some((head, body)) = read_request(&mut stream) else {
        return;
    };
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    match path.as_str() {
        "/" | "/html" => respond(&mut stream, "200 OK", &[("Content-Type", "text/html")], HTML.as_bytes()),
        "/gzip" => respond(
            &mut stream,
            "200 OK",
            &[("Content-Type", "text/html"), ("Content-Encoding", "gzip")],
            GZIP_BODY,
        ),
        "/redirect" => respond(&mut stream, "302 Found", &[("Location", "/html")], b""),
        "/echo" => {
            let mut echoed = head.into_bytes();
            echoed.extend_from_slice(b"\r\n\r\n");
            echoed.extend_from_slice(&body);
            respond(&mut stream, "200 OK", &[("Content-Type", "text/plain")], &echoed)
        }
        "/slow" => {
            thread::sleep(Duration::from_secs(3));
            respond(&mut stream, "200 OK", &[("Content-Type", "text/plain")], b"late")
        }
        _ => respond(&mut stream, "404 Not Found", &[], b""),
    }
}

/// Reads the request head (without the blank line) and a Content-Length body.
fn read_request(stream: &mut TcpStream) -> Option<(String, Vec<u8>)> {
    let mut data = Vec::new();
    let mut buf = [0u8; 8192];
    let head_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };
    let head = String::from_utf8_lossy(&data[..head_end]).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = data[head_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
    }
    Some((head, body))
}

fn respond(stream: &mut TcpStream, status: &str, headers: &[(&str, &str)], body: &[u8]) {
    let mut out = format!("HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n", status, body.len());
    for (name, value) in headers {
        out.push_str(&format!("{}: {}\r\n", name, value));
    }
    out.push_str("\r\n");
    let _ = stream.write_all(out.as_bytes());
    let _ = stream.write_all(body);
}
