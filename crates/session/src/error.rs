use thiserror::Error;

/// Failure opening or driving an SSH session. The host explorer matches on
/// these to decide a terminal device status.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("authentication to {host} was rejected")]
    AuthFailure { host: String },

    #[error("{host} is unreachable: {source}")]
    Unreachable {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out waiting for {host} after {timeout_secs}s")]
    Timeout { host: String, timeout_secs: f64 },

    #[error("SSH protocol error with {host}: {source}")]
    Protocol {
        host: String,
        #[source]
        source: russh::Error,
    },

    #[error("no private key could be loaded from {path}: {source}")]
    KeyLoad {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}
