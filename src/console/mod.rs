//! Server-side display: the sink abstraction, terminal clearing, and the
//! single-consumer queue every connection writes through.
//!
//! ```text
//! connection ─┐
//! connection ─┼─► ConsoleHandle ─► mpsc ─► consumer thread ─► ConsoleSink
//! connection ─┘                                            (clear + write)
//! ```
//!
//! A clear and the message that follows it are always applied together,
//! so concurrent connections can reorder whole messages but never split
//! one from its clear.

pub mod clear;
pub mod memory;
pub mod queue;
pub mod terminal;

pub use clear::ClearMode;
pub use memory::{ConsoleEvent, MemoryConsole};
pub use queue::{ConsoleHandle, ConsoleQueue};
pub use terminal::TerminalConsole;

/// Destination for displayed messages.
///
/// Implementations are driven from a single consumer thread, so they do
/// not need interior synchronization.
pub trait ConsoleSink: Send + 'static {
    /// Clears the display.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the display cannot be cleared.
    fn clear(&mut self) -> std::io::Result<()>;

    /// Writes one message followed by a line break.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the write fails.
    fn write(&mut self, text: &str) -> std::io::Result<()>;
}
