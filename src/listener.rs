//! Listener / Acceptor (§2, §4.5 entry point). One per configured
//! `server {}` block, grounded on the teacher's `TcpListener::bind` +
//! `tokio::select!` accept loop in `main.rs`, generalized to many listeners
//! (one per `ServerConfig`) and to the TLS handshake step the teacher never
//! needed. Re-arms its accept before any session bookkeeping runs, so a
//! slow handler never blocks new connections (§5).

use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio_rustls::TlsAcceptor;

use crate::config::{ServerConfig, ServerType};
use crate::error::StartupError;
use crate::session::{self, SessionContext};
use crate::tls;

pub struct Listener {
    server: Arc<ServerConfig>,
    ctx: Arc<SessionContext>,
    tls_acceptor: Option<TlsAcceptor>,
}

impl Listener {
    /// Builds the listener for one server block, compiling its TLS material
    /// up front (if any) so a bad certificate fails at startup rather than
    /// on first connection.
    pub fn new(server: Arc<ServerConfig>, ctx: Arc<SessionContext>) -> Result<Self, StartupError> {
        let tls_acceptor = match server.server_type {
            ServerType::HttpsServer => {
                let config = tls::build_server_config(&server).map_err(|source| StartupError::Tls {
                    port: server.port,
                    source,
                })?;
                Some(TlsAcceptor::from(Arc::new(config)))
            }
            ServerType::HttpServer => None,
        };
        Ok(Listener {
            server,
            ctx,
            tls_acceptor,
        })
    }

    /// Binds and serves until `shutdown` is signalled. Errors binding the
    /// socket are logged and the listener simply never starts serving;
    /// other server blocks are unaffected.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let addr = format!("0.0.0.0:{}", self.server.port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(source) => {
                tracing::error!(port = self.server.port, error = %source, "failed to bind listener");
                return;
            }
        };

        tracing::info!(
            port = self.server.port,
            tls = self.tls_acceptor.is_some(),
            "listener bound"
        );

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            let _ = stream.set_nodelay(true);
                            self.spawn_session(stream, peer.to_string());
                        }
                        Err(source) => {
                            tracing::warn!(port = self.server.port, error = %source, "accept failed");
                        }
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!(port = self.server.port, "listener stopped");
    }

    fn spawn_session(&self, stream: TcpStream, client_ip: String) {
        let server = Arc::clone(&self.server);
        let ctx = Arc::clone(&self.ctx);

        match &self.tls_acceptor {
            Some(acceptor) => {
                let acceptor = acceptor.clone();
                tokio::spawn(async move {
                    match acceptor.accept(stream).await {
                        Ok(tls_stream) => {
                            session::handle_connection(tls_stream, server, ctx, client_ip).await
                        }
                        Err(source) => {
                            tracing::warn!(client_ip, error = %source, "tls handshake failed");
                        }
                    }
                });
            }
            None => {
                tokio::spawn(session::handle_connection(stream, server, ctx, client_ip));
            }
        }
    }
}
