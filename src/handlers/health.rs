//! Health Handler (§4.10). A liveness probe: reports a fixed JSON status
//! body, bypassing the location matcher and the filesystem entirely.
//! `Analytics::report()`'s HTML fragment (§4.11) is a separate, unrouted
//! library function — it is not wired to this or any other route.

use crate::analytics::Analytics;
use crate::http::{Request, Response};

pub fn handle(analytics: &Analytics, req: &Request) -> Response {
    analytics.record_health();
    let connection = if req.keep_alive() { "keep-alive" } else { "close" };
    Response::new(200)
        .with_header("Connection", connection)
        .with_header("Content-Type", "application/json")
        .with_body(b"{\"status\":\"healthy\"}".to_vec())
}
