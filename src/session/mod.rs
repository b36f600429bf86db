//! Per-connection session state machine (§5). Grounded on
//! `session_base.cc`/`https_session.cc`: a connection is read in a loop,
//! accumulating bytes until a complete request is buffered, dispatched to a
//! handler, and the response written back; `Connection: keep-alive`
//! determines whether the loop continues or the transport is closed.

pub mod state;
pub mod stream;

use crate::analytics::Analytics;
use crate::config::model::{LocationBlock, Modifier};
use crate::config::ServerConfig;
use crate::handlers::{file, health, post, redirect};
use crate::http::request::parse_partial;
use crate::http::{response::error_response, verify, Response};
use crate::limits::RuntimeLimits;
use crate::location;
use crate::logging;
use crate::registry::{HandlerKind, Registry};
use state::SessionState;
use std::sync::Arc;
use stream::Transport;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;

pub struct SessionContext {
    pub registry: Arc<Registry>,
    pub analytics: Arc<Analytics>,
    pub limits: Arc<RuntimeLimits>,
}

/// Drives one accepted connection to completion. `client_ip` is resolved by
/// the caller (it requires a peer-address lookup the generic transport
/// can't perform) and is only used for logging.
pub async fn handle_connection<S: Transport>(
    mut stream: S,
    server: Arc<ServerConfig>,
    ctx: Arc<SessionContext>,
    client_ip: String,
) {
    let mut buffer: Vec<u8> = Vec::with_capacity(ctx.limits.max_chunk);
    let mut chunk = vec![0u8; ctx.limits.max_chunk];
    let mut state = SessionState::Reading;

    loop {
        let read_result = timeout(
            ctx.limits.keepalive_timeout,
            stream.read(&mut chunk),
        )
        .await;

        let n = match read_result {
            Ok(Ok(0)) => {
                close(&mut state, &client_ip, "peer closed connection");
                return;
            }
            Ok(Ok(n)) => n,
            Ok(Err(_)) => {
                close(&mut state, &client_ip, "transport read error");
                return;
            }
            Err(_) => {
                close(&mut state, &client_ip, "keepalive timeout elapsed");
                return;
            }
        };

        buffer.extend_from_slice(&chunk[..n]);

        if buffer.len() > ctx.limits.max_request {
            let res = error_response(413, false);
            ctx.analytics.record_malicious();
            write_and_log(&mut stream, &res, &client_ip, buffer.len(), "(Content Too Large)").await;
            return;
        }

        match parse_partial(&buffer) {
            None => continue,
            Some(req) => {
                if let Some(len) = req.content_length() {
                    if len > ctx.limits.max_request {
                        let res = error_response(413, false);
                        ctx.analytics.record_malicious();
                        write_and_log(&mut stream, &res, &client_ip, buffer.len(), "(Content Too Large)").await;
                        return;
                    }
                    if req.body.len() < len {
                        continue; // body not fully buffered yet
                    }
                }

                state = SessionState::Writing;

                let (res, summary) = if server.ret != 0 {
                    let summary = format!("{} {}", req.method_raw, req.target);
                    (redirect::handle(&server, &req), summary)
                } else if let Some(status) = verify::verify(&req) {
                    if status == 403 {
                        ctx.analytics.record_malicious();
                    } else {
                        ctx.analytics.record_invalid();
                    }
                    (error_response(status, false), "(Invalid)".to_string())
                } else {
                    let summary = format!("{} {}", req.method_raw, req.target);
                    let res = match ctx.registry.dispatch(&req) {
                        HandlerKind::Health => health::handle(&ctx.analytics, &req),
                        HandlerKind::File => {
                            ctx.analytics.record_get();
                            match location::resolve(&server, &req.target) {
                                Some(loc) => file::handle(loc, &req).await,
                                // §4.7 step 5: no location block matched (or none are
                                // configured at all) — resolve directly against
                                // config.root/config.index via a synthetic, unrouted
                                // location rather than short-circuiting to a bare 404.
                                None => {
                                    let mut root_loc = LocationBlock::new(
                                        String::new(),
                                        Modifier::NoModifier,
                                        false,
                                    );
                                    root_loc.root = server.root.clone();
                                    root_loc.index = server.index.clone();
                                    file::handle(&root_loc, &req).await
                                }
                            }
                        }
                        HandlerKind::Post => {
                            ctx.analytics.record_post();
                            post::handle(&server.root, &req, &ctx.registry.process_runner).await
                        }
                    };
                    (res, summary)
                };

                let keep_alive = res.keep_alive();
                write_and_log(&mut stream, &res, &client_ip, buffer.len(), &summary).await;
                buffer.clear();

                if !keep_alive {
                    state = SessionState::Closing;
                    return;
                }
                state = SessionState::Reading;
            }
        }
    }
}

async fn write_and_log<S: Transport>(
    stream: &mut S,
    res: &Response,
    client_ip: &str,
    request_bytes: usize,
    summary: &str,
) {
    let bytes = res.to_bytes();
    if stream.write_all(&bytes).await.is_err() {
        return;
    }
    let _ = stream.flush().await;
    logging::response_metrics(client_ip, summary, request_bytes, bytes.len(), res.status);
}

fn close(state: &mut SessionState, client_ip: &str, reason: &str) {
    *state = SessionState::Closing;
    tracing::info!(target: "nginxd::session", client_ip, reason, "closing connection");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{Modifier, ServerType};
    use crate::handlers::post::NoopProcessRunner;
    use crate::limits::RuntimeLimits;
    use std::sync::Arc;
    use tokio::io::duplex;

    fn test_context() -> Arc<SessionContext> {
        Arc::new(SessionContext {
            registry: Arc::new(Registry::new(Arc::new(NoopProcessRunner))),
            analytics: Arc::new(Analytics::new()),
            limits: Arc::new(RuntimeLimits::default()),
        })
    }

    #[tokio::test]
    async fn serves_a_simple_get_over_a_duplex_stream() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), b"hello").unwrap();

        let mut server = ServerConfig::default();
        server.server_type = ServerType::HttpServer;
        server.root = dir.path().to_string_lossy().to_string();
        server.index = "index.html".to_string();
        let mut loc = crate::config::LocationBlock::new(
            "/".to_string(),
            Modifier::NoModifier,
            false,
        );
        loc.root = server.root.clone();
        loc.index = server.index.clone();
        server.push_location(Modifier::NoModifier, loc);

        let (client, server_side) = duplex(4096);
        let ctx = test_context();
        let handle = tokio::spawn(handle_connection(
            server_side,
            Arc::new(server),
            ctx,
            "127.0.0.1".to_string(),
        ));

        let mut client = client;
        client
            .write_all(b"GET /index.html HTTP/1.1\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();

        let mut response = Vec::new();
        client.read_to_end(&mut response).await.unwrap();
        handle.await.unwrap();

        let text = String::from_utf8_lossy(&response);
        assert!(text.starts_with("HTTP/1.1 200 OK"));
        assert!(text.ends_with("hello"));
    }
}
