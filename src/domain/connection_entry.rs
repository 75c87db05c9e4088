//! Server-side record of one open connection.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ConnectionId;

/// Metadata kept for an open connection while it is in the registry.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionEntry {
    /// Connection identifier.
    pub id: ConnectionId,

    /// Request path the client upgraded on (any path is accepted).
    pub path: String,

    /// When the upgrade completed.
    pub opened_at: DateTime<Utc>,

    /// Messages displayed and acknowledged on this connection so far.
    pub messages: u64,
}

impl ConnectionEntry {
    /// Creates an entry for a connection that just opened.
    #[must_use]
    pub fn new(id: ConnectionId, path: impl Into<String>) -> Self {
        Self {
            id,
            path: path.into(),
            opened_at: Utc::now(),
            messages: 0,
        }
    }
}
