//! In-memory sink that records every display operation.

use std::sync::{Arc, Mutex, PoisonError};

use super::ConsoleSink;

/// One recorded display operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// The display was cleared.
    Clear,
    /// A message was written.
    Write(String),
}

/// Console sink that appends to a shared log instead of a terminal.
///
/// Clones share the same log, so a test keeps one clone and hands the
/// other to the server.
#[derive(Debug, Clone, Default)]
pub struct MemoryConsole {
    events: Arc<Mutex<Vec<ConsoleEvent>>>,
}

impl MemoryConsole {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every recorded operation, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<ConsoleEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns only the written messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ConsoleEvent::Write(text) => Some(text),
                ConsoleEvent::Clear => None,
            })
            .collect()
    }

    fn push(&self, event: ConsoleEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl ConsoleSink for MemoryConsole {
    fn clear(&mut self) -> std::io::Result<()> {
        self.push(ConsoleEvent::Clear);
        Ok(())
    }

    fn write(&mut self, text: &str) -> std::io::Result<()> {
        self.push(ConsoleEvent::Write(text.to_string()));
        Ok(())
    }
}
