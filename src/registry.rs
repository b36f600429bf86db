//! Request Handler Registry (§4.4). The original keeps a process-wide
//! singleton (`Registry::inst()`) populated by static initializers before
//! `main()` runs. Per the redesign flag steering away from hidden
//! static-init ordering, this is instead an explicit, non-singleton value
//! built once in `main` and shared via `Arc`.

use crate::handlers::ProcessRunner;
use crate::http::{Method, Request};
use std::sync::Arc;

/// Which handler a request should be routed to, mirroring the original's
/// free-function `dispatch()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Health,
    File,
    Post,
}

pub struct Registry {
    pub process_runner: Arc<dyn ProcessRunner>,
}

impl Registry {
    pub fn new(process_runner: Arc<dyn ProcessRunner>) -> Self {
        Registry { process_runner }
    }

    /// Classifies a verified request. Caller has already run
    /// [`crate::http::verify::verify`], so only GET and POST remain.
    pub fn dispatch(&self, req: &Request) -> HandlerKind {
        match req.method {
            Method::Get if req.target == "/health" => HandlerKind::Health,
            Method::Get => HandlerKind::File,
            _ => HandlerKind::Post,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::post::NoopProcessRunner;
    use crate::http::HttpVersion;
    use std::collections::HashMap;

    fn get(target: &str) -> Request {
        Request {
            method: Method::Get,
            method_raw: "GET".to_string(),
            target: target.to_string(),
            version: HttpVersion::Http11,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    #[test]
    fn health_path_routes_to_health() {
        let registry = Registry::new(Arc::new(NoopProcessRunner));
        assert_eq!(registry.dispatch(&get("/health")), HandlerKind::Health);
    }

    #[test]
    fn other_get_routes_to_file() {
        let registry = Registry::new(Arc::new(NoopProcessRunner));
        assert_eq!(registry.dispatch(&get("/index.html")), HandlerKind::File);
    }

    #[test]
    fn post_routes_to_post_handler() {
        let registry = Registry::new(Arc::new(NoopProcessRunner));
        let mut req = get("/run");
        req.method = Method::Post;
        assert_eq!(registry.dispatch(&req), HandlerKind::Post);
    }
}
