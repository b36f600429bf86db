//! Process-level shutdown signal handling (§6), grounded on the teacher's
//! `shutdown_signal` future composition in `main.rs`: race Ctrl+C against
//! SIGTERM (unix only) and resolve when either fires.

use tokio::signal;

/// Resolves once SIGINT or SIGTERM arrives. The caller is responsible for
/// propagating that as a stop signal to whatever listeners it is running.
pub async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
