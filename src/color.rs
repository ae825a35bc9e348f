//! Named foreground colors for the spinner glyph and status symbols.

use std::fmt;
use std::str::FromStr;

use crossterm::style::{Color, Stylize};

/// The eight basic terminal colors plus gray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpinnerColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
}

impl SpinnerColor {
    pub const ALL: [SpinnerColor; 9] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Yellow,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::White,
        Self::Gray,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
            Self::Gray => "gray",
        }
    }

    fn terminal_color(self) -> Color {
        match self {
            Self::Black => Color::Black,
            Self::Red => Color::DarkRed,
            Self::Green => Color::DarkGreen,
            Self::Yellow => Color::DarkYellow,
            Self::Blue => Color::DarkBlue,
            Self::Magenta => Color::DarkMagenta,
            Self::Cyan => Color::DarkCyan,
            Self::White => Color::Grey,
            Self::Gray => Color::DarkGrey,
        }
    }

    /// Wrap `text` in this color's escape codes.
    pub fn paint(self, text: &str) -> String {
        text.with(self.terminal_color()).to_string()
    }
}

impl fmt::Display for SpinnerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpinnerColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let wanted = if wanted == "grey" { "gray" } else { wanted.as_str() };
        Self::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| format!("unknown color '{s}'"))
    }
}

/// Apply `color` if one is set.
pub fn colorize(color: Option<SpinnerColor>, text: &str) -> String {
    match color {
        Some(color) => color.paint(text),
        None => text.to_string(),
    }
}
