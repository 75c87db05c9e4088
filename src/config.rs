//! Server configuration loaded from environment variables.
//!
//! Every setting has a default that reproduces the stock behaviour
//! (`localhost:8765`, plain-text logs). A `.env` file is picked up via
//! `dotenvy` when present.

use std::time::Duration;

use crate::error::ConfigError;

/// Default bind host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8765;

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Top-level server configuration.
///
/// Loaded once at startup via [`EchoConfig::from_env`].
#[derive(Debug, Clone)]
pub struct EchoConfig {
    /// Host name or address to bind the listener to.
    pub host: String,

    /// TCP port to bind the listener to. `0` asks the OS for a free port.
    pub port: u16,

    /// How long shutdown waits for open connections to close.
    pub shutdown_grace: Duration,

    /// Tracing output format.
    pub log_format: LogFormat,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            shutdown_grace: Duration::from_secs(5),
            log_format: LogFormat::Text,
        }
    }
}

impl EchoConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to the defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `ECHO_PORT` is set but is not a
    /// valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `ECHO_PORT` is present but
    /// unparsable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("ECHO_HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or(defaults.host);

        let port = match lookup("ECHO_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "ECHO_PORT",
                value: raw,
            })?,
            None => defaults.port,
        };

        let shutdown_grace = Duration::from_secs(parse_or(
            &lookup,
            "ECHO_SHUTDOWN_GRACE_SECS",
            defaults.shutdown_grace.as_secs(),
        ));

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            host,
            port,
            shutdown_grace,
            log_format,
        })
    }

    /// Returns the `host:port` string the listener binds to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
