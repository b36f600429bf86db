//! Static File Handler (§4.7). Grounded on the original's
//! `FileRequestHandler::handle_request`, but resolution is driven by the
//! matched location block's `root`/`index`/`try_files` rather than the
//! precomputed in-memory file cache the teacher repo builds at startup:
//! `try_files` implies live filesystem checks per request, which a
//! startup-time cache cannot answer.

use crate::config::LocationBlock;
use crate::http::{Request, Response};
use crate::mime::get_mime_type;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub async fn handle(loc: &LocationBlock, req: &Request) -> Response {
    let resolved = resolve(loc, &req.target).await;

    let keep_alive = req.keep_alive();
    let connection = if keep_alive { "keep-alive" } else { "close" };

    match resolved {
        Resolved::Status(404) => serve_not_found(loc, connection).await,
        Resolved::Status(code) => Response::new(code).with_header("Connection", connection),
        Resolved::File(path) => serve_file(&path, req, connection).await,
    }
}

enum Resolved {
    File(PathBuf),
    Status(u16),
}

/// Applies `try_files` (if configured) or a direct root+target lookup,
/// falling back to the location's index file for a missing/directory path.
async fn resolve(loc: &LocationBlock, target: &str) -> Resolved {
    if loc.has_try_files() {
        for candidate in &loc.try_files_args {
            let path = join(&loc.root, candidate);
            if is_servable_file(&path).await {
                return Resolved::File(path);
            }
        }
        return match loc.try_files_fallback.strip_prefix('=') {
            Some(code) => Resolved::Status(code.parse().unwrap_or(404)),
            None => Resolved::File(join(&loc.root, &loc.try_files_fallback)),
        };
    }

    let direct = join(&loc.root, target);
    if is_servable_file(&direct).await {
        return Resolved::File(direct);
    }
    let index = join(&loc.root, &loc.index);
    if is_servable_file(&index).await {
        return Resolved::File(index);
    }
    Resolved::Status(404)
}

fn join(root: &str, fragment: &str) -> PathBuf {
    Path::new(root).join(fragment.trim_start_matches('/'))
}

async fn is_servable_file(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file(),
        Err(_) => false,
    }
}

/// §4.7 step 6 / §9's canonical React-Router-fallback behavior: a 404 still
/// carries a body, serving the location's configured `index` file rather
/// than an empty status line. If even that file is unreadable, falls back
/// to a bare 404 with no body.
async fn serve_not_found(loc: &LocationBlock, connection: &str) -> Response {
    let index = join(&loc.root, &loc.index);
    let metadata = match tokio::fs::metadata(&index).await {
        Ok(m) if m.is_file() => m,
        _ => return Response::new(404).with_header("Connection", connection),
    };

    let last_modified = http_date(metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH));
    let content_type = get_mime_type(&index);

    match tokio::fs::read(&index).await {
        Ok(bytes) => Response::new(404)
            .with_header("Connection", connection)
            .with_header("Cache-Control", "public, max-age=604800, immutable")
            .with_header("Last-Modified", last_modified)
            .with_header("Content-Type", content_type)
            .with_body(bytes),
        Err(_) => Response::new(404).with_header("Connection", connection),
    }
}

async fn serve_file(path: &Path, req: &Request, connection: &str) -> Response {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(m) => m,
        Err(_) => return Response::new(404).with_header("Connection", connection),
    };

    let last_modified = http_date(metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH));

    if let Some(cached) = req.header("if-modified-since") {
        if cached == last_modified {
            return Response::new(304)
                .with_header("Connection", connection)
                .with_header("Cache-Control", "public, max-age=604800, immutable");
        }
    }

    let content_type = get_mime_type(path);

    match tokio::fs::read(path).await {
        Ok(bytes) => Response::new(200)
            .with_header("Connection", connection)
            .with_header("Cache-Control", "public, max-age=604800, immutable")
            .with_header("Last-Modified", last_modified)
            .with_header("Content-Type", content_type)
            .with_body(bytes),
        Err(_) => Response::new(500)
            .with_header("Connection", connection)
            .with_header("Content-Type", "text/html")
            .with_body(b"<h1>Internal Server Error (Error 500).</h1>\n".to_vec()),
    }
}

fn http_date(time: SystemTime) -> String {
    httpdate::fmt_http_date(time)
}
