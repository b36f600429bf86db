//! Entry point (§6). Grounded on the teacher's `#[tokio::main] async fn
//! main()`: parse one CLI argument, bind, serve, shut down on signal. The
//! teacher only ever ran one listener on one static port; here `main`
//! builds one [`Listener`] per parsed `ServerConfig` and runs them
//! concurrently, all sharing one [`SessionContext`].

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use nginxd::analytics::Analytics;
use nginxd::config;
use nginxd::error::StartupError;
use nginxd::handlers::TokioProcessRunner;
use nginxd::limits::RuntimeLimits;
use nginxd::listener::Listener;
use nginxd::logging;
use nginxd::registry::Registry;
use nginxd::session::SessionContext;
use nginxd::signals;
use nginxd::tls;

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        tracing::error!(argc = args.len(), "usage: nginxd <config-path>");
        return ExitCode::FAILURE;
    }

    match run(&args[1]).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "startup failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config_path: &str) -> Result<(), StartupError> {
    let working_directory = resolve_working_directory();
    tracing::info!(config_path, working_directory, "loading configuration");

    let servers = config::load(Path::new(config_path), &working_directory)?;
    tls::ensure_crypto_provider_installed();

    let registry = Arc::new(Registry::new(Arc::new(TokioProcessRunner)));
    let analytics = Arc::new(Analytics::new());
    let limits = Arc::new(RuntimeLimits::default());
    let ctx = Arc::new(SessionContext {
        registry,
        analytics,
        limits,
    });

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let mut listeners = Vec::with_capacity(servers.len());
    for server in servers {
        let port = server.port;
        let listener = Listener::new(Arc::new(server), Arc::clone(&ctx))?;
        let rx = shutdown_rx.clone();
        listeners.push((port, tokio::spawn(listener.run(rx))));
    }

    tracing::info!(listeners = listeners.len(), "server running");

    signals::wait_for_shutdown_signal().await;
    tracing::info!("shutdown signal received, stopping listeners");
    let _ = shutdown_tx.send(true);

    for (port, task) in listeners {
        if task.await.is_err() {
            tracing::warn!(port, "listener task panicked during shutdown");
        }
    }

    tracing::info!("server shutdown complete");
    Ok(())
}

/// §6: "derived from the binary path (resolve the binary's absolute path,
/// take its grand-grandparent directory)". Three `parent()` calls from the
/// resolved executable path: its containing directory, that directory's
/// parent, and that parent's parent.
fn resolve_working_directory() -> String {
    let exe = env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
    let canonical = exe.canonicalize().unwrap_or(exe);
    canonical
        .parent()
        .and_then(Path::parent)
        .and_then(Path::parent)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string())
}
