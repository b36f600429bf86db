//! End-to-end scenarios from spec §8, driven over an in-memory duplex
//! stream through the real session state machine
//! (`nginxd::session::handle_connection`) rather than a live TCP socket —
//! deterministic, no port contention between test binaries.

use nginxd::analytics::Analytics;
use nginxd::config::model::{Modifier, ServerType};
use nginxd::config::{LocationBlock, ServerConfig};
use nginxd::handlers::post::NoopProcessRunner;
use nginxd::limits::RuntimeLimits;
use nginxd::registry::Registry;
use nginxd::session::{handle_connection, SessionContext};
use std::sync::Arc;
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

fn test_context() -> Arc<SessionContext> {
    Arc::new(SessionContext {
        registry: Arc::new(Registry::new(Arc::new(NoopProcessRunner))),
        analytics: Arc::new(Analytics::new()),
        limits: Arc::new(RuntimeLimits::default()),
    })
}

async fn roundtrip(server: ServerConfig, request: &[u8]) -> String {
    let (mut client, server_side) = duplex(8192);
    let ctx = test_context();
    let handle = tokio::spawn(handle_connection(
        server_side,
        Arc::new(server),
        ctx,
        "127.0.0.1:0".to_string(),
    ));

    client.write_all(request).await.unwrap();
    let mut response = Vec::new();
    client.read_to_end(&mut response).await.unwrap();
    handle.await.unwrap();
    String::from_utf8_lossy(&response).to_string()
}

/// Scenario 1: React-Router fallback via `try_files`.
#[tokio::test]
async fn serves_try_files_fallback_for_unknown_spa_route() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("small.html"), b"<html>spa shell</html>").unwrap();

    let mut server = ServerConfig::default();
    server.server_type = ServerType::HttpServer;
    server.root = dir.path().to_string_lossy().to_string();
    server.index = "small.html".to_string();

    let mut loc = LocationBlock::new("/".to_string(), Modifier::NoModifier, false);
    loc.root = server.root.clone();
    loc.index = server.index.clone();
    loc.try_files_args = vec!["$uri".to_string()];
    loc.try_files_fallback = "/small.html".to_string();
    server.push_location(Modifier::NoModifier, loc);

    let response = roundtrip(
        server,
        b"GET /resume HTTP/1.1\r\nHost: x\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains("Content-Type: text/html"));
    assert!(response.ends_with("<html>spa shell</html>"));
}

/// Scenario 4: a 3xx `return` expands `$scheme`/`$host`/`$request_uri`.
#[tokio::test]
async fn redirect_expands_placeholders_end_to_end() {
    let mut server = ServerConfig::default();
    server.server_type = ServerType::HttpServer;
    server.host = "example.com".to_string();
    server.ret = 301;
    server.ret_val = "$scheme://$host$request_uri".to_string();

    let response = roundtrip(
        server,
        b"GET /foo HTTP/1.1\r\nHost: example.com\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 301 Moved Permanently"));
    assert!(response.contains("Location: http://example.com/foo"));
    assert!(response.ends_with("Redirecting to http://example.com/foo"));
}

/// Scenario 5, exercised through the real parser + dispatcher rather than
/// hand-built `LocationBlock`s: `^~` beats a shorter `^~`, and wins the
/// overall tie-break against a shorter no-modifier block.
#[tokio::test]
async fn location_precedence_through_real_config_parse() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("stopmodifier.html"), b"stopmodifier wins").unwrap();

    let src = format!(
        "http {{ server {{\n\
            listen 8080; root {root}; index index.html;\n\
            location = /a {{ }}\n\
            location ^~ /stopmod {{ }}\n\
            location ^~ /stopmodifier {{ try_files /stopmodifier.html =404; }}\n\
            location /stopmod {{ }}\n\
         }} }}",
        root = dir.path().display()
    );

    let configs = nginxd::config::parser::parse(&src, "/wd").expect("config parses");
    let server = configs.into_iter().next().unwrap();

    let response = roundtrip(
        server,
        b"GET /stopmodifier/x HTTP/1.1\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.ends_with("stopmodifier wins"));
}

/// A server with `ret` set short-circuits location matching and the
/// filesystem entirely, even for a target that doesn't exist on disk.
#[tokio::test]
async fn return_directive_short_circuits_before_dispatch() {
    let mut server = ServerConfig::default();
    server.ret = 503;
    server.ret_val = "offline for maintenance".to_string();

    let response = roundtrip(
        server,
        b"GET /anything HTTP/1.1\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 503"));
    assert!(response.ends_with("offline for maintenance"));
}

/// `GET /health` bypasses the location matcher entirely (§4.10).
#[tokio::test]
async fn health_endpoint_bypasses_location_matching() {
    let mut server = ServerConfig::default();
    server.root = "/does/not/exist".to_string();
    server.index = "index.html".to_string();

    let response = roundtrip(server, b"GET /health HTTP/1.1\r\nConnection: close\r\n\r\n").await;

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains("application/json"));
    assert!(response.ends_with(r#"{"status":"healthy"}"#));
}
