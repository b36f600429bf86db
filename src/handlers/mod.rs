//! Request handlers (§4.7-§4.10): static file serving, return/redirect
//! responses, the sandboxed dynamic POST handler, and the health endpoint.

pub mod file;
pub mod health;
pub mod post;
pub mod redirect;

use std::future::Future;
use std::pin::Pin;

/// Captured stdout/stderr of a completed child process.
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Thin seam over process execution (§4.9). The dynamic POST handler is
/// sandboxed to invoking only pre-approved, registry-resolved executables;
/// the concrete sandboxing/pipe plumbing behind this trait is out of scope.
pub trait ProcessRunner: Send + Sync {
    fn run<'a>(
        &'a self,
        executable: &'a str,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = std::io::Result<ProcessOutput>> + Send + 'a>>;
}

/// Runs the executable as a child process via `tokio::process::Command`,
/// feeding `input` on its stdin and collecting stdout/stderr.
pub struct TokioProcessRunner;

impl ProcessRunner for TokioProcessRunner {
    fn run<'a>(
        &'a self,
        executable: &'a str,
        input: &'a str,
    ) -> Pin<Box<dyn Future<Output = std::io::Result<ProcessOutput>> + Send + 'a>> {
        Box::pin(async move {
            use tokio::io::AsyncWriteExt;
            use tokio::process::Command;

            let mut child = Command::new(executable)
                .stdin(std::process::Stdio::piped())
                .stdout(std::process::Stdio::piped())
                .stderr(std::process::Stdio::piped())
                .spawn()?;

            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(input.as_bytes()).await?;
            }

            let output = child.wait_with_output().await?;
            Ok(ProcessOutput {
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        })
    }
}
