//! Request Verifier (§4.5). Mirrors `verify_req` from the original session
//! base: returns `Some(status)` for the first violation found, `None` if the
//! request is acceptable to dispatch.

use super::request::{HttpVersion, Method, Request};

pub fn verify(req: &Request) -> Option<u16> {
    match req.method {
        Method::Get | Method::Post => {}
        Method::Other => {
            return Some(if req.method_raw.is_empty() { 400 } else { 405 });
        }
    }

    if req.target.contains("..") {
        return Some(403);
    }
    if req.target.contains("%2e") {
        return Some(403);
    }
    if req.target.contains("%%32%65") {
        return Some(403);
    }

    match req.version {
        HttpVersion::Http09
        | HttpVersion::Http10
        | HttpVersion::Http11
        | HttpVersion::Http20
        | HttpVersion::Http30 => {}
        HttpVersion::Unknown => return Some(505),
    }

    if req.method == Method::Post && req.content_length().is_none() {
        return Some(411);
    }

    None
}
