//! Error types for the listener crate.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// The UDP socket could not be bound. Fatal at startup.
#[derive(Error, Debug)]
#[error("failed to bind UDP socket on {addr}: {source}")]
pub struct BindError {
    pub addr: SocketAddr,
    #[source]
    pub source: io::Error,
}

impl BindError {
    /// Underlying OS error kind (address in use, permission denied, ...).
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}

/// Terminal outcome of a receive loop that did not stop on request.
#[derive(Error, Debug)]
pub enum ListenerError {
    /// A non-transient socket error ended the receive loop.
    #[error("UDP socket failed: {source}")]
    SocketFatal {
        #[source]
        source: io::Error,
    },

    /// The receive or decode task panicked or was cancelled.
    #[error("listener task failed: {0}")]
    TaskFailed(String),
}

/// Rejected [`ListenerConfig`](crate::ListenerConfig) value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid bind address {value:?}: {reason}")]
    InvalidAddress { value: String, reason: String },

    #[error("listen port must be in 1..=65535, got 0")]
    InvalidPort,

    #[error("at least one packet format must be enabled")]
    NoFormats,

    #[error("unsupported packet format {0}")]
    UnknownFormat(u16),

    #[error("queue capacity must be at least 1")]
    ZeroQueueCapacity,
}

/// Failure to bring up a listener from configuration.
#[derive(Error, Debug)]
pub enum StartError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bind(#[from] BindError),
}
