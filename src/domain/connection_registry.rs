//! Concurrent registry of open connections.
//!
//! [`ConnectionRegistry`] is how the server knows which connections are
//! still alive: the health endpoint reports from it and shutdown waits on
//! it until every connection has gone.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Notify, RwLock};

use super::{ConnectionEntry, ConnectionId};

/// Store of all currently open connections.
///
/// # Concurrency
///
/// The map is behind a single [`RwLock`]. Entries are small and updates are
/// one per message, so per-entry locking is not needed.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, ConnectionEntry>>,
    messages_handled: AtomicU64,
    idle: Notify,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an open connection.
    pub async fn insert(&self, entry: ConnectionEntry) {
        self.connections.write().await.insert(entry.id, entry);
    }

    /// Removes a connection, returning its final entry if it was present.
    ///
    /// Wakes [`ConnectionRegistry::wait_idle`] callers when the last
    /// connection leaves.
    pub async fn remove(&self, id: ConnectionId) -> Option<ConnectionEntry> {
        let mut map = self.connections.write().await;
        let removed = map.remove(&id);
        if map.is_empty() {
            self.idle.notify_waiters();
        }
        removed
    }

    /// Counts one handled message against `id`.
    ///
    /// Returns the connection's new message count, or `None` if the
    /// connection is not registered.
    pub async fn record_message(&self, id: ConnectionId) -> Option<u64> {
        let mut map = self.connections.write().await;
        let entry = map.get_mut(&id)?;
        entry.messages += 1;
        self.messages_handled.fetch_add(1, Ordering::Relaxed);
        Some(entry.messages)
    }

    /// Returns a snapshot of every open connection, oldest first.
    pub async fn list(&self) -> Vec<ConnectionEntry> {
        let map = self.connections.read().await;
        let mut entries: Vec<ConnectionEntry> = map.values().cloned().collect();
        entries.sort_by_key(|e| e.opened_at);
        entries
    }

    /// Returns the number of open connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` if no connection is open.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }

    /// Total messages handled by every connection since startup.
    #[must_use]
    pub fn messages_handled(&self) -> u64 {
        self.messages_handled.load(Ordering::Relaxed)
    }

    /// Waits until no connection is open, or `timeout` elapses.
    ///
    /// Returns `true` if the registry drained in time.
    pub async fn wait_idle(&self, timeout: Duration) -> bool {
        let drained = async {
            loop {
                let notified = self.idle.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();
                if self.is_empty().await {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(timeout, drained).await.is_ok()
    }
}
