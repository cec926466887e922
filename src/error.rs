//! Startup error module
//!
//! Everything that can stop the server before it starts accepting
//! connections. Request-level failures never reach this type: they are
//! answered with an HTTP status instead.

use std::net::SocketAddr;

#[derive(Debug)]
pub enum StartupError {
    /// Configuration could not be read or deserialized
    Config(config::ConfigError),
    /// `server.host`/`server.port` do not form a socket address
    InvalidAddress(String),
    /// Served root directory is missing or unusable
    Root { path: String, source: std::io::Error },
    /// Listening socket could not be bound
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    /// Log files could not be opened
    Log(std::io::Error),
    /// Tokio runtime could not be built
    Runtime(std::io::Error),
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::InvalidAddress(msg) => write!(f, "invalid listen address {msg}"),
            Self::Root { path, source } => {
                write!(f, "cannot serve directory '{path}': {source}")
            }
            Self::Bind { addr, source } => write!(f, "failed to bind {addr}: {source}"),
            Self::Log(e) => write!(f, "failed to open log file: {e}"),
            Self::Runtime(e) => write!(f, "failed to start runtime: {e}"),
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::InvalidAddress(_) => None,
            Self::Root { source, .. } | Self::Bind { source, .. } => Some(source),
            Self::Log(e) | Self::Runtime(e) => Some(e),
        }
    }
}

impl From<config::ConfigError> for StartupError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e)
    }
}
