//! Errors raised while setting up or keeping a listening socket.
//!
//! Per-session failures never show up here: they are logged inside the
//! session task and go no further.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Every candidate port in the recovery range refused to bind.
    #[error("could not find a port within {first}-{last} to bind to (counter reached {counter})")]
    PortsExhausted { counter: u32, first: u16, last: u16 },

    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;
