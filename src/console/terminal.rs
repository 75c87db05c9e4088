//! The real display: a writer (stdout by default) plus a [`ClearMode`].

use std::io::{self, Stdout, Write};

use super::{ClearMode, ConsoleSink};

/// Console sink that clears and prints to a terminal stream.
#[derive(Debug)]
pub struct TerminalConsole<W = Stdout> {
    out: W,
    mode: ClearMode,
}

impl TerminalConsole<Stdout> {
    /// Creates a sink on the process's standard output.
    #[must_use]
    pub fn stdout(mode: ClearMode) -> Self {
        Self::new(io::stdout(), mode)
    }
}

impl<W: Write> TerminalConsole<W> {
    /// Creates a sink on an arbitrary writer.
    #[must_use]
    pub const fn new(out: W, mode: ClearMode) -> Self {
        Self { out, mode }
    }

    /// Returns the clear mode this sink was built with.
    #[must_use]
    pub const fn mode(&self) -> ClearMode {
        self.mode
    }

    /// Consumes the sink and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send + 'static> ConsoleSink for TerminalConsole<W> {
    fn clear(&mut self) -> io::Result<()> {
        self.mode.clear(&mut self.out)
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }
}
