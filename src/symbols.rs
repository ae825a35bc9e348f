//! Status symbols written by `succeed`, `fail`, `warn` and `info`.

use crate::color::SpinnerColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Success,
    Error,
    Warning,
    Info,
}

impl Symbol {
    /// Bare glyph, Unicode or its ASCII-safe stand-in.
    pub fn glyph(self, unicode: bool) -> &'static str {
        match (self, unicode) {
            (Self::Success, true) => "✔",
            (Self::Success, false) => "√",
            (Self::Error, true) => "✖",
            (Self::Error, false) => "×",
            (Self::Warning, true) => "⚠",
            (Self::Warning, false) => "‼",
            (Self::Info, true) => "ℹ",
            (Self::Info, false) => "i",
        }
    }

    pub fn color(self) -> SpinnerColor {
        match self {
            Self::Success => SpinnerColor::Green,
            Self::Error => SpinnerColor::Red,
            Self::Warning => SpinnerColor::Yellow,
            Self::Info => SpinnerColor::Blue,
        }
    }

    /// Colored glyph, ready to be persisted.
    pub fn render(self, unicode: bool) -> String {
        self.color().paint(self.glyph(unicode))
    }
}
