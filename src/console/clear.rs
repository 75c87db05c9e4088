//! Terminal clearing, dispatched on OS family.

use std::io::{self, Write};
use std::process::Command;

/// Escape sequence that homes the cursor, clears the screen, and drops
/// the scrollback. Same bytes `clear` prints on xterm-compatible terminals.
pub const ANSI_CLEAR: &str = "\x1b[H\x1b[2J\x1b[3J";

/// How the terminal is cleared on this host.
///
/// Resolved once at startup with [`ClearMode::detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearMode {
    /// Unix-family terminals: write [`ANSI_CLEAR`] to the output stream.
    PosixLike,
    /// Windows consoles: run `cmd /C cls`.
    WindowsLike,
}

impl ClearMode {
    /// Picks the mode for the OS family the process is running on.
    #[must_use]
    pub fn detect() -> Self {
        Self::for_family(std::env::consts::FAMILY)
    }

    /// Picks the mode for an OS family name as reported by
    /// [`std::env::consts::FAMILY`].
    #[must_use]
    pub fn for_family(family: &str) -> Self {
        if family.eq_ignore_ascii_case("windows") {
            Self::WindowsLike
        } else {
            Self::PosixLike
        }
    }

    /// Clears the terminal attached to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing the escape sequence fails, or if `cls`
    /// cannot be spawned or exits unsuccessfully.
    pub fn clear<W: Write>(self, out: &mut W) -> io::Result<()> {
        match self {
            Self::PosixLike => {
                out.write_all(ANSI_CLEAR.as_bytes())?;
                out.flush()
            }
            Self::WindowsLike => {
                // cls writes to the console directly; anything still buffered
                // in `out` would land after the clear.
                out.flush()?;
                let status = Command::new("cmd").args(["/C", "cls"]).status()?;
                if status.success() {
                    Ok(())
                } else {
                    Err(io::Error::other(format!("cls exited with {status}")))
                }
            }
        }
    }
}
