//! TLS material loading (§6). The teacher's original session hierarchy
//! (plain/TLS) only ever consumes a handshake-complete/stream-read/write
//! contract — per §1 the TLS library itself is an external collaborator.
//! This module is the one seam that actually touches `rustls`: turning the
//! `ssl_certificate`/`ssl_certificate_key` PEM paths validated by
//! [`crate::config::model::ServerConfig::validate`] into a
//! `rustls::ServerConfig` an acceptor can hand to [`crate::listener`].

use crate::config::ServerConfig;
use std::fs::File;
use std::io::{self, BufReader};

/// Builds a single-certificate TLS server config for one `server {}` block.
/// Server selection in this design is by listening port only (§1 Non-goals),
/// so there is no SNI-based certificate resolver: each HTTPS listener gets
/// exactly the certificate/key pair its own `server` block names.
pub fn build_server_config(server: &ServerConfig) -> io::Result<rustls::ServerConfig> {
    let certs = load_certs(&server.certificate)?;
    let key = load_private_key(&server.private_key)?;

    rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}

fn load_certs(path: &str) -> io::Result<Vec<rustls::pki_types::CertificateDer<'static>>> {
    let mut reader = BufReader::new(File::open(path)?);
    rustls_pemfile::certs(&mut reader).collect()
}

fn load_private_key(path: &str) -> io::Result<rustls::pki_types::PrivateKeyDer<'static>> {
    let mut reader = BufReader::new(File::open(path)?);
    rustls_pemfile::private_key(&mut reader)?
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "no private key found in PEM file"))
}

/// Installs the process-wide default crypto provider rustls 0.23 requires
/// before any `rustls::ServerConfig` can be built. Idempotent: a second
/// install attempt (e.g. a config with several HTTPS server blocks) is
/// simply ignored.
pub fn ensure_crypto_provider_installed() {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}
