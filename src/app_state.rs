//! Shared application state injected into the Axum handler.

use std::sync::Arc;

use tokio::sync::watch;

use crate::console::ConsoleHandle;
use crate::domain::ConnectionRegistry;

/// Shared state available to the handler via Axum's `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Producer side of the display queue.
    pub console: ConsoleHandle,
    /// Registry of open connections.
    pub registry: Arc<ConnectionRegistry>,
    /// Shutdown notification shared by every connection.
    pub shutdown: watch::Receiver<bool>,
}
