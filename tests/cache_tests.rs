//! Caching behavior from §4.7: `Cache-Control`/`Last-Modified` on a normal
//! 200, a conditional `If-Modified-Since` round trip collapsing to 304,
//! and the same headers carried on the React-Router-style 404 fallback
//! body (§4.7 step 6), all driven end-to-end through the session state
//! machine rather than calling the file handler directly.

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

fn static_server(dir: &std::path::Path) -> ServerConfig {
    let mut server = ServerConfig::default();
    server.server_type = ServerType::HttpServer;
    server.root = dir.to_string_lossy().to_string();
    server.index = "index.html".to_string();
    let mut loc = LocationBlock::new("/".to_string(), Modifier::NoModifier, false);
    loc.root = server.root.clone();
    loc.index = server.index.clone();
    server.push_location(Modifier::NoModifier, loc);
    server
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

fn header_value<'a>(response: &'a str, name: &str) -> Option<&'a str> {
    response
        .lines()
        .find_map(|line| line.strip_prefix(&format!("{name}: ")))
        .map(|v| v.trim_end_matches('\r'))
}

/// A freshly served file always carries `Cache-Control` and `Last-Modified`.
#[tokio::test]
async fn fresh_file_carries_cache_headers() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), b"cached body").unwrap();

    let response = roundtrip(
        static_server(dir.path()),
        b"GET /index.html HTTP/1.1\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(
        header_value(&response, "Cache-Control"),
        Some("public, max-age=604800, immutable")
    );
    assert!(header_value(&response, "Last-Modified").is_some());
    assert!(response.ends_with("cached body"));
}

/// An `If-Modified-Since` matching the file's current mtime collapses the
/// response to a bodyless 304, carrying `Cache-Control` but no `Content-Type`.
#[tokio::test]
async fn matching_if_modified_since_yields_304() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.html");
    std::fs::write(&path, b"cached body").unwrap();
    let mtime = std::fs::metadata(&path).unwrap().modified().unwrap();
    let last_modified = httpdate::fmt_http_date(mtime);

    let request = format!(
        "GET /index.html HTTP/1.1\r\nIf-Modified-Since: {last_modified}\r\nConnection: close\r\n\r\n"
    );
    let response = roundtrip(static_server(dir.path()), request.as_bytes()).await;

    assert!(response.starts_with("HTTP/1.1 304"));
    assert_eq!(
        header_value(&response, "Cache-Control"),
        Some("public, max-age=604800, immutable")
    );
    assert!(!response.contains("Content-Type"));
}

/// A stale `If-Modified-Since` (older than the file) still gets the full
/// 200 body rather than being treated as a match.
#[tokio::test]
async fn stale_if_modified_since_still_serves_full_body() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), b"cached body").unwrap();

    let request = b"GET /index.html HTTP/1.1\r\nIf-Modified-Since: Mon, 01 Jan 1990 00:00:00 GMT\r\nConnection: close\r\n\r\n";
    let response = roundtrip(static_server(dir.path()), request).await;

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.ends_with("cached body"));
}

/// The 404 React-Router fallback body carries the same cache headers as a
/// normal hit, since it serves `config.index`'s real file bytes.
#[tokio::test]
async fn not_found_fallback_body_carries_cache_headers_too() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), b"<app></app>").unwrap();

    let mut server = ServerConfig::default();
    server.server_type = ServerType::HttpServer;
    server.root = dir.path().to_string_lossy().to_string();
    server.index = "index.html".to_string();
    let mut loc = LocationBlock::new("/".to_string(), Modifier::NoModifier, false);
    loc.root = server.root.clone();
    loc.index = server.index.clone();
    loc.try_files_args = vec!["$uri".to_string()];
    loc.try_files_fallback = "=404".to_string();
    server.push_location(Modifier::NoModifier, loc);

    let response = roundtrip(
        server,
        b"GET /some/spa/route HTTP/1.1\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 404"));
    assert_eq!(
        header_value(&response, "Cache-Control"),
        Some("public, max-age=604800, immutable")
    );
    assert_eq!(header_value(&response, "Content-Type"), Some("text/html"));
    assert!(response.ends_with("<app></app>"));
}
