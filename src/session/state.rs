//! Per-connection session states, used for tracing/diagnostics. The control
//! flow itself lives in [`super::handle_connection`]; this enum exists so
//! state transitions can be logged and asserted on in tests without
//! threading a string through every trace call.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepted, TLS handshake (if any) not yet complete.
    AwaitingHandshake,
    /// Reading request bytes off the transport.
    Reading,
    /// Writing a response back to the client.
    Writing,
    /// Session is being torn down.
    Closing,
}

impl SessionState {
    pub fn name(self) -> &'static str {
        match self {
            SessionState::AwaitingHandshake => "awaiting_handshake",
            SessionState::Reading => "reading",
            SessionState::Writing => "writing",
            SessionState::Closing => "closing",
        }
    }
}
