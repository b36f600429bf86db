//! Return/Redirect Responder. Grounded on the original's
//! `session_base::create_return_response`: a server-level `return` directive
//! short-circuits all location/request-body processing and produces either
//! a redirect (3xx, with `$scheme`/`$host`/`$request_uri` substitution in
//! the `Location` value) or a plain status+body response.

use crate::config::{ServerConfig, ServerType};
use crate::http::{Request, Response};

pub fn handle(server: &ServerConfig, req: &Request) -> Response {
    let keep_alive = req.keep_alive();
    let connection = if keep_alive { "keep-alive" } else { "close" };
    let res = Response::new(server.ret).with_header("Connection", connection);

    if server.ret / 100 == 3 {
        let scheme = match server.server_type {
            ServerType::HttpServer => "http",
            ServerType::HttpsServer => "https",
        };
        let resolved = server
            .ret_val
            .replace("$scheme", scheme)
            .replace("$host", &server.host)
            .replace("$request_uri", &req.target);
        let body = format!("Redirecting to {}", resolved);
        res.with_header("Location", resolved).with_body(body.into_bytes())
    } else {
        res.with_body(server.ret_val.clone().into_bytes())
    }
}
