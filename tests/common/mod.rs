//! A virtual terminal for driving spinners in integration tests.
//!
//! Models just enough of a real terminal to catch row accounting bugs: a
//! fixed-width cell grid, deferred auto-wrap at the right margin, wide glyphs
//! taking two cells, relative cursor movement and erase-to-end-of-line.
//! Escape sequences inside written text (colors) are dropped.

#![allow(dead_code)]

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use twirl::{Environment, Options, Output};
use unicode_width::UnicodeWidthChar;

/// Placeholder for the right half of a wide glyph.
const WIDE_TAIL: char = '\0';

struct Screen {
    columns: usize,
    rows: Vec<Vec<char>>,
    row: usize,
    col: usize,
    /// Set after writing into the last column; the next glyph wraps first.
    pending_wrap: bool,
    cursor_visible: bool,
    log: Vec<String>,
}

impl Screen {
    fn ensure_row(&mut self, row: usize) {
        while self.rows.len() <= row {
            self.rows.push(vec![' '; self.columns]);
        }
    }

    fn newline(&mut self) {
        self.row += 1;
        self.col = 0;
        self.pending_wrap = false;
        self.ensure_row(self.row);
    }

    fn put(&mut self, c: char) {
        match c {
            '\n' => return self.newline(),
            '\r' => {
                self.col = 0;
                self.pending_wrap = false;
                return;
            }
            _ => {}
        }
        let width = c.width().unwrap_or(0);
        if width == 0 {
            return;
        }
        if self.pending_wrap || self.col + width > self.columns {
            self.newline();
        }
        self.ensure_row(self.row);
        let row = &mut self.rows[self.row];
        row[self.col] = c;
        if width == 2 {
            row[self.col + 1] = WIDE_TAIL;
        }
        self.col += width;
        if self.col >= self.columns {
            self.col = self.columns - 1;
            self.pending_wrap = true;
        }
    }

    fn clear_line(&mut self) {
        self.ensure_row(self.row);
        let start = if self.col > 0 && self.rows[self.row][self.col] == WIDE_TAIL {
            self.col - 1
        } else {
            self.col
        };
        for cell in &mut self.rows[self.row][start..] {
            *cell = ' ';
        }
        self.pending_wrap = false;
    }
}

/// Clones share the same screen.
#[derive(Clone)]
pub struct VirtualTerminal {
    screen: Arc<Mutex<Screen>>,
}

impl VirtualTerminal {
    pub fn new(columns: u16) -> Self {
        let columns = usize::from(columns.max(1));
        Self {
            screen: Arc::new(Mutex::new(Screen {
                columns,
                rows: vec![vec![' '; columns]],
                row: 0,
                col: 0,
                pending_wrap: false,
                cursor_visible: true,
                log: Vec::new(),
            })),
        }
    }

    fn screen(&self) -> std::sync::MutexGuard<'_, Screen> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Visible rows with trailing blanks trimmed.
    pub fn lines(&self) -> Vec<String> {
        self.screen()
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|c| **c != WIDE_TAIL)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    /// The screen as text, without trailing empty rows.
    pub fn contents(&self) -> String {
        let mut lines = self.lines();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    pub fn is_blank(&self) -> bool {
        self.contents().is_empty()
    }

    /// `(row, column)`, zero based.
    pub fn cursor(&self) -> (usize, usize) {
        let screen = self.screen();
        (screen.row, screen.col)
    }

    pub fn cursor_visible(&self) -> bool {
        self.screen().cursor_visible
    }

    /// Every write and cursor operation, in order.
    pub fn log(&self) -> Vec<String> {
        self.screen().log.clone()
    }

    /// Only the text writes, escape codes removed.
    pub fn writes(&self) -> Vec<String> {
        self.log()
            .into_iter()
            .filter_map(|entry| entry.strip_prefix("write:").map(str::to_string))
            .collect()
    }

    /// Change the width without reflowing, as a terminal resize would.
    pub fn resize(&self, columns: u16) {
        let mut screen = self.screen();
        let columns = usize::from(columns.max(1));
        screen.columns = columns;
        for row in &mut screen.rows {
            row.resize(columns, ' ');
        }
        screen.col = screen.col.min(columns - 1);
    }

    /// Put text on screen directly, as another writer would.
    pub fn type_text(&self, text: &str) {
        let mut screen = self.screen();
        for c in text.chars() {
            screen.put(c);
        }
    }
}

impl Output for VirtualTerminal {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        let plain = console::strip_ansi_codes(text);
        let mut screen = self.screen();
        screen.log.push(format!("write:{plain}"));
        for c in plain.chars() {
            screen.put(c);
        }
        Ok(())
    }

    fn is_terminal(&self) -> bool {
        true
    }

    fn columns(&self) -> Option<u16> {
        u16::try_from(self.screen().columns).ok()
    }

    fn cursor_to(&mut self, column: u16) -> io::Result<()> {
        let mut screen = self.screen();
        screen.log.push(format!("cursor_to:{column}"));
        screen.col = usize::from(column).min(screen.columns - 1);
        screen.pending_wrap = false;
        Ok(())
    }

    fn move_cursor(&mut self, dx: i16, dy: i16) -> io::Result<()> {
        let mut screen = self.screen();
        screen.log.push(format!("move_cursor:{dx},{dy}"));
        screen.row = screen.row.saturating_add_signed(isize::from(dy));
        let col = screen.col.saturating_add_signed(isize::from(dx));
        screen.col = col.min(screen.columns - 1);
        screen.pending_wrap = false;
        let row = screen.row;
        screen.ensure_row(row);
        Ok(())
    }

    fn clear_line(&mut self) -> io::Result<()> {
        let mut screen = self.screen();
        screen.log.push("clear_line".to_string());
        screen.clear_line();
        Ok(())
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        let mut screen = self.screen();
        screen.log.push("hide_cursor".to_string());
        screen.cursor_visible = false;
        Ok(())
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        let mut screen = self.screen();
        screen.log.push("show_cursor".to_string());
        screen.cursor_visible = true;
        Ok(())
    }
}

/// Options for an enabled, uncolored spinner drawing into `terminal`.
pub fn options(terminal: &VirtualTerminal, text: &str) -> Options {
    Options {
        text: text.into(),
        color: None,
        is_enabled: Some(true),
        discard_stdin: false,
        environment: Environment::capable(),
        ..Options::default()
    }
    .with_output(terminal.clone())
}
