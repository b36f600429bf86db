//! Dynamic POST Handler (§4.9). Grounded on the original's
//! `PostRequestHandler::handle_request`: parses a JSON body naming an
//! executable under the server root, runs it via [`ProcessRunner`], and
//! reports its stdout/stderr. Unlike the original (which concatenates
//! stderr+stdout into a single `output` field), the response body here uses
//! the `{"cout":...,"cerr":...}` shape.

use super::ProcessRunner;
use crate::http::{Request, Response};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct PostBody {
    input: String,
    input_as_file: bool,
    source: String,
}

const SIMULATIONS_DIR: &str = "simulations";

pub async fn handle(root: &str, req: &Request, runner: &Arc<dyn ProcessRunner>) -> Response {
    let keep_alive = req.keep_alive();
    let connection = if keep_alive { "keep-alive" } else { "close" };

    let body: PostBody = match serde_json::from_slice(&req.body) {
        Ok(b) => b,
        Err(_) => return json_response(400, &connection, "Error 400: Bad Request", ""),
    };

    if body.source.contains("..") {
        return json_response(403, &connection, "", "source path rejected");
    }

    let executable = Path::new(root).join(SIMULATIONS_DIR).join(&body.source);
    let executable = executable.to_string_lossy().to_string();

    let input = if body.input_as_file {
        let input_file = Path::new(root)
            .join(SIMULATIONS_DIR)
            .join("temp_input.txt");
        if tokio::fs::write(&input_file, &body.input).await.is_err() {
            return json_response(500, &connection, "", "Error 500: Internal Server Error");
        }
        let path_arg = input_file.to_string_lossy().to_string();
        let result = runner.run(&executable, &path_arg).await;
        let _ = tokio::fs::write(&input_file, "").await;
        result
    } else {
        runner.run(&executable, &body.input).await
    };

    match input {
        Ok(output) => {
            let cout = escape(&output.stdout);
            let cerr = escape(&output.stderr);
            Response::new(200)
                .with_header("Connection", connection)
                .with_header("Cache-Control", "public, max-age=604800, immutable")
                .with_header("Content-Type", "application/json")
                .with_body(format!("{{\"cout\":\"{cout}\",\"cerr\":\"{cerr}\"}}").into_bytes())
        }
        Err(_) => json_response(404, &connection, "", "executable not found"),
    }
}

fn escape(s: &str) -> String {
    s.replace('\n', "\\n").replace('\t', "\\t")
}

fn json_response(status: u16, connection: &str, cout: &str, cerr: &str) -> Response {
    Response::new(status)
        .with_header("Connection", connection)
        .with_header("Content-Type", "application/json")
        .with_body(format!("{{\"cout\":\"{cout}\",\"cerr\":\"{cerr}\"}}").into_bytes())
}

/// A process runner that never actually spawns anything; used in tests for
/// handler wiring that doesn't exercise process execution.
pub struct NoopProcessRunner;

impl ProcessRunner for NoopProcessRunner {
    fn run<'a>(
        &'a self,
        _executable: &'a str,
        _input: &'a str,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = std::io::Result<super::ProcessOutput>> + Send + 'a>,
    > {
        Box::pin(async move {
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "noop runner never resolves an executable",
            ))
        })
    }
}
