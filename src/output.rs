//! Where frames go.
//!
//! [`Output`] is the sink the engine writes to and queries for width and
//! interactivity. Cursor primitives default to ANSI sequences written through
//! [`Output::write_str`], so a sink only has to accept text.

use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex, PoisonError};

use crossterm::Command;
use crossterm::cursor::{Hide, MoveDown, MoveLeft, MoveRight, MoveToColumn, MoveUp, Show};
use crossterm::terminal::{self, Clear, ClearType};

/// A terminal-like destination for spinner output.
pub trait Output: Send {
    fn write_str(&mut self, text: &str) -> io::Result<()>;

    /// Whether cursor movement is meaningful on this sink.
    fn is_terminal(&self) -> bool;

    /// Current width in columns, if known.
    fn columns(&self) -> Option<u16> {
        None
    }

    /// Move the cursor to `column` (zero based) on the current row.
    fn cursor_to(&mut self, column: u16) -> io::Result<()> {
        self.write_str(&ansi(MoveToColumn(column)))
    }

    /// Move the cursor relative to where it is.
    fn move_cursor(&mut self, dx: i16, dy: i16) -> io::Result<()> {
        let mut seq = String::new();
        match dx {
            0 => {}
            d if d < 0 => seq.push_str(&ansi(MoveLeft(d.unsigned_abs()))),
            d => seq.push_str(&ansi(MoveRight(d.unsigned_abs()))),
        }
        match dy {
            0 => {}
            d if d < 0 => seq.push_str(&ansi(MoveUp(d.unsigned_abs()))),
            d => seq.push_str(&ansi(MoveDown(d.unsigned_abs()))),
        }
        if seq.is_empty() {
            return Ok(());
        }
        self.write_str(&seq)
    }

    /// Clear from the cursor to the end of the current row.
    fn clear_line(&mut self) -> io::Result<()> {
        self.write_str(&ansi(Clear(ClearType::UntilNewLine)))
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.write_str(&ansi(Hide))
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.write_str(&ansi(Show))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Render a crossterm command to its escape sequence.
fn ansi(command: impl Command) -> String {
    let mut seq = String::new();
    // Writing into a String cannot fail.
    let _ = command.write_ansi(&mut seq);
    seq
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// One of the process's standard streams.
#[derive(Debug)]
pub struct TerminalOutput {
    stream: Stream,
    terminal: bool,
}

impl TerminalOutput {
    pub fn stderr() -> Self {
        Self {
            stream: Stream::Stderr,
            terminal: io::stderr().is_terminal(),
        }
    }

    pub fn stdout() -> Self {
        Self {
            stream: Stream::Stdout,
            terminal: io::stdout().is_terminal(),
        }
    }

    fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        match self.stream {
            Stream::Stdout => io::stdout().lock().write_all(bytes),
            Stream::Stderr => io::stderr().lock().write_all(bytes),
        }
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::stderr()
    }
}

impl Output for TerminalOutput {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        // Raw mode (while stdin is discarded) turns off output
        // post-processing, so a bare LF would not return the carriage.
        if self.terminal && text.contains('\n') && terminal::is_raw_mode_enabled().unwrap_or(false)
        {
            return self.write_bytes(text.replace('\n', "\r\n").as_bytes());
        }
        self.write_bytes(text.as_bytes())
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn columns(&self) -> Option<u16> {
        if !self.terminal {
            return None;
        }
        terminal::size().ok().map(|(columns, _)| columns)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.stream {
            Stream::Stdout => io::stdout().flush(),
            Stream::Stderr => io::stderr().flush(),
        }
    }
}

/// In-memory sink that records everything written, escape codes included.
///
/// Clones share the same buffer, so a test can keep one and hand the other
/// to a spinner.
#[derive(Clone, Default)]
pub struct BufferOutput {
    buffer: Arc<Mutex<String>>,
    terminal: bool,
    columns: Option<u16>,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend to be a terminal of the given width.
    pub fn terminal(columns: u16) -> Self {
        Self {
            terminal: true,
            columns: Some(columns),
            ..Self::default()
        }
    }

    pub fn contents(&self) -> String {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for BufferOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferOutput")
            .field("terminal", &self.terminal)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl Output for BufferOutput {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(text);
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }

    fn columns(&self) -> Option<u16> {
        self.columns
    }
}
