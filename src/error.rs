//! Behavioral error taxonomy (§7). Config errors are fatal at startup;
//! session errors are always caught at the connection boundary and turned
//! into either a response or a logged close — they never unwind past
//! `session::handle_connection`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid token \"{0}\"")]
    InvalidToken(String),

    #[error("malformed {context} block (size {actual}, expected {expected})")]
    MalformedBlock {
        context: &'static str,
        actual: usize,
        expected: usize,
    },

    #[error("unknown target context \"{0}\"")]
    UnknownContext(String),

    #[error("invalid context transition to \"{0}\"")]
    InvalidTransition(String),

    #[error("unknown location modifier \"{0}\"")]
    UnknownModifier(String),

    #[error("unknown directive \"{directive}\" in {context} context")]
    UnknownDirective {
        directive: String,
        context: &'static str,
    },

    #[error("malformed \"{directive}\" directive: {detail}")]
    MalformedDirective {
        directive: &'static str,
        detail: String,
    },

    #[error("statements are not permitted in {0} context")]
    UnexpectedStatement(&'static str),

    #[error("invalid port \"{0}\"")]
    InvalidPort(String),

    #[error("invalid return code \"{0}\"")]
    InvalidReturnCode(String),

    #[error("server block failed validation: {0}")]
    ServerValidation(&'static str),

    #[error("config has no server blocks")]
    Empty,

    #[error("unexpected end of file while in {0} context")]
    UnexpectedEof(&'static str),

    #[error("could not read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("tls handshake failed: {0}")]
    Handshake(std::io::Error),

    #[error("connection closed by peer")]
    Eof,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("expected exactly one argument: <config-path>, got {0}")]
    BadArgs(usize),

    #[error("failed to bind listener on port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load TLS material for port {port}: {source}")]
    Tls {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}
