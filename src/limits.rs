use std::time::Duration;

/// Process tunables that the nginx grammar itself has no directives for.
/// Built once in `main` and shared by reference with every listener and
/// session — deliberately not free-floating `const`s, so tests can exercise
/// boundary behavior (§8) with a shrunk `MAX_REQUEST` instead of 4096 bytes.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeLimits {
    /// Size of one read chunk off the socket.
    pub max_chunk: usize,
    /// Absolute ceiling on accumulated request bytes. A request exactly at
    /// this size is accepted; one byte over is treated as abuse (413).
    pub max_request: usize,
    /// Per-connection idle ceiling covering the whole request/response cycle.
    pub connection_timeout: Duration,
    /// How long a kept-alive connection may wait for the next request line.
    pub keepalive_timeout: Duration,
    /// TCP listen backlog passed to the acceptor.
    pub listen_backlog: u32,
}

impl Default for RuntimeLimits {
    fn default() -> Self {
        const MAX_CHUNK: usize = 1024;
        RuntimeLimits {
            max_chunk: MAX_CHUNK,
            max_request: MAX_CHUNK * 4,
            connection_timeout: Duration::from_secs(30),
            keepalive_timeout: Duration::from_secs(5),
            listen_backlog: 1024,
        }
    }
}
