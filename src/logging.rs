//! Structured logging setup. Mirrors the original `Log` facade's level set
//! (trace/debug/info/warn/error) plus a dedicated machine-parseable
//! response-metrics record, realized with `tracing` instead of a bespoke
//! BOOST_LOG_TRIVIAL wrapper.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Must run once, before any listener binds.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// Logs one completed response. Kept as a single call site so the line
/// format stays machine-parseable the way the original's `Log::res_metrics`
/// was, rather than scattering ad hoc `info!` calls across the session code.
pub fn response_metrics(
    client_ip: &str,
    summary: &str,
    req_bytes: usize,
    res_bytes: usize,
    status: u16,
) {
    tracing::info!(
        target: "nginxd::response",
        client_ip,
        status,
        summary,
        req_bytes,
        res_bytes,
        "response"
    );
}
