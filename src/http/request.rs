//! HTTP/1.x request line + header parsing, mirroring the teacher's
//! zero-allocation byte-level style rather than pulling in a full HTTP crate.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other,
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub method_raw: String,
    pub target: String,
    pub version: HttpVersion,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVersion {
    Http09,
    Http10,
    Http11,
    Http20,
    Http30,
    Unknown,
}

impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(|s| s.as_str())
    }

    pub fn content_length(&self) -> Option<usize> {
        self.header("content-length").and_then(|v| v.trim().parse().ok())
    }

    pub fn keep_alive(&self) -> bool {
        match self.header("connection") {
            Some(v) if v.eq_ignore_ascii_case("close") => false,
            Some(v) if v.eq_ignore_ascii_case("keep-alive") => true,
            _ => self.version == HttpVersion::Http11,
        }
    }
}

/// Parses as much of `buf` as forms a complete request line + header block.
/// Returns `None` if the header section is not yet fully buffered (no blank
/// line found); the caller should keep reading.
pub fn parse_partial(buf: &[u8]) -> Option<Request> {
    let header_end = find_subslice(buf, b"\r\n\r\n")?;
    let head = &buf[..header_end];
    let body_start = header_end + 4;

    let mut lines = head.split(|&b| b == b'\n').map(strip_cr);
    let request_line = lines.next()?;
    let (method_raw, target, version) = parse_request_line(request_line)?;

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        if let Some(colon) = line.iter().position(|&b| b == b':') {
            let name = String::from_utf8_lossy(&line[..colon]).trim().to_ascii_lowercase();
            let value = String::from_utf8_lossy(&line[colon + 1..]).trim().to_string();
            headers.insert(name, value);
        }
    }

    let method = match method_raw.as_str() {
        "GET" => Method::Get,
        "POST" => Method::Post,
        "" => Method::Other,
        _ => Method::Other,
    };

    let body = buf[body_start..].to_vec();

    Some(Request {
        method,
        method_raw,
        target,
        version,
        headers,
        body,
    })
}

fn parse_request_line(line: &[u8]) -> Option<(String, String, HttpVersion)> {
    let text = std::str::from_utf8(line).ok()?;
    let mut parts = text.split(' ').filter(|s| !s.is_empty());
    let method = parts.next().unwrap_or("").to_string();
    let target = parts.next().unwrap_or("").to_string();
    let version = match parts.next() {
        Some("HTTP/1.1") => HttpVersion::Http11,
        Some("HTTP/1.0") => HttpVersion::Http10,
        Some("HTTP/0.9") => HttpVersion::Http09,
        Some("HTTP/2.0") | Some("HTTP/2") => HttpVersion::Http20,
        Some("HTTP/3.0") | Some("HTTP/3") => HttpVersion::Http30,
        Some(_) => HttpVersion::Unknown,
        None => HttpVersion::Http09,
    };
    if method.is_empty() || target.is_empty() {
        return None;
    }
    Some((method, target, version))
}

fn strip_cr(line: &[u8]) -> &[u8] {
    if let Some((&last, rest)) = line.split_last() {
        if last == b'\r' {
            return rest;
        }
    }
    line
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
