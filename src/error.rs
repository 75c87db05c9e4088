//! Error types for configuration, server lifecycle, and connections.
//!
//! Connection errors are scoped to a single WebSocket and never leave
//! its task. [`ServerError`] covers the startup and accept-loop paths,
//! where a bind failure is fatal for the process.

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable was set to a value that cannot be parsed.
    #[error("invalid value for {key}: {value:?}")]
    Invalid {
        /// Environment variable name.
        key: &'static str,
        /// Raw value as found in the environment.
        value: String,
    },
}

/// Errors raised by the listener lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The `host:port` that was requested.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The accept loop failed after startup.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Reasons a single connection's message loop ends.
///
/// Both variants are handled the same way: the loop stops and the
/// connection's resources are released.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// The peer closed the connection or the stream ended.
    #[error("connection closed")]
    Closed,

    /// Reading from or writing to the socket failed.
    #[error("transport error: {0}")]
    Transport(#[from] axum::Error),
}

impl ConnectionError {
    /// Returns `true` for the orderly-close case.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_error_names_address() {
        let err = ServerError::Bind {
            addr: "localhost:8765".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        let msg = err.to_string();
        assert!(msg.contains("localhost:8765"));
        assert!(msg.contains("in use"));
    }

    #[test]
    fn closed_is_distinguished_from_transport() {
        assert!(ConnectionError::Closed.is_closed());
        let transport = ConnectionError::Transport(axum::Error::new(std::io::Error::other("reset")));
        assert!(!transport.is_closed());
        assert!(transport.to_string().contains("reset"));
    }

    #[test]
    fn config_error_shows_key_and_value() {
        let err = ConfigError::Invalid {
            key: "ECHO_PORT",
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "invalid value for ECHO_PORT: \"abc\"");
    }
}
