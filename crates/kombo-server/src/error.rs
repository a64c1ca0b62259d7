//! Error types for the static file server.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The configured host and port do not form a socket address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// The listener could not be bound, usually because the port is taken.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The directory to serve does not exist.
    #[error("Serve root not found: {}", .0.display())]
    RootMissing(PathBuf),

    /// IO error while serving.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// A recovery suggestion for the operator, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ServerError::Bind { source, .. } if source.kind() == std::io::ErrorKind::AddrInUse => {
                Some("another process is using the port; stop it or pass --port")
            }
            ServerError::RootMissing(_) => Some("run the build first so the staging directory exists"),
            _ => None,
        }
    }
}

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
