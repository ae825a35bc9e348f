//! Row accounting for the rendered block.
//!
//! The engine must know how many terminal rows the last frame occupied so it
//! can erase exactly that many before drawing the next one. Too few leaves
//! stale rows behind; too many eats output that was printed above the
//! spinner.
//!
//! Rows are measured on a stand-in string rather than the real frame:
//!
//! ```text
//! <indent spaces><prefix>-  ---  <text>  -<suffix>
//! ```
//!
//! The `-` markers take the place of the single-space separators. The glyph
//! slot is a run of `-` as wide as the glyph plus its separator. Callers pass
//! the widest frame of the definition, so the count never depends on which
//! frame happens to be showing.

use unicode_width::UnicodeWidthChar;

/// Column count assumed when the output cannot report one.
pub const DEFAULT_COLUMNS: u16 = 80;

const MARKER: char = '-';

/// Evaluated text surrounding the spinner glyph.
#[derive(Debug, Clone, Copy, Default)]
pub struct Content<'a> {
    pub indent: usize,
    pub prefix: &'a str,
    pub text: &'a str,
    pub suffix: &'a str,
    /// Columns taken by the spinner glyph. Zero is measured as one.
    pub glyph_width: usize,
}

impl Content<'_> {
    /// The string whose layout matches the rendered frame.
    pub fn measurement(&self) -> String {
        let glyph_slot = self.glyph_width.max(1) + 1;
        let mut out = String::with_capacity(
            self.indent + self.prefix.len() + self.text.len() + self.suffix.len() + glyph_slot + 2,
        );
        out.extend(std::iter::repeat_n(' ', self.indent));
        if !self.prefix.is_empty() {
            out.push_str(self.prefix);
            out.push(MARKER);
        }
        out.extend(std::iter::repeat_n(MARKER, glyph_slot));
        out.push_str(self.text);
        if !self.suffix.is_empty() {
            out.push(MARKER);
            out.push_str(self.suffix);
        }
        out
    }

    /// Number of rows this content occupies at the given width.
    pub fn line_count(&self, columns: u16) -> usize {
        count_rows(&self.measurement(), columns)
    }
}

/// Terminal columns occupied by `text`. Escape sequences and control
/// characters take none; wide glyphs take two.
pub fn display_width(text: &str) -> usize {
    plain_width(&console::strip_ansi_codes(text))
}

fn plain_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Rows needed to show `text` at `columns`, honoring explicit newlines and
/// soft wrapping. Escape sequences are ignored. Every line, even an empty
/// one, takes at least one row.
pub fn count_rows(text: &str, columns: u16) -> usize {
    let columns = usize::from(columns.max(1));
    console::strip_ansi_codes(text)
        .split('\n')
        .map(|line| plain_width(line).div_ceil(columns).max(1))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(text: &str) -> Content<'_> {
        Content {
            text,
            ..Content::default()
        }
    }

    #[test]
    fn width_of_ascii_and_wide() {
        assert_eq!(display_width("foo"), 3);
        assert_eq!(display_width("🦄"), 2);
        assert_eq!(display_width("中文"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn control_characters_have_no_width() {
        assert_eq!(display_width("a\rb\x07"), 2);
    }

    #[test]
    fn escape_sequences_have_no_width() {
        assert_eq!(display_width("\x1b[36m⠋\x1b[39m"), 1);
        assert_eq!(display_width("\x1b[1m\x1b[31mbold\x1b[0m"), 4);
    }

    #[test]
    fn empty_line_takes_one_row() {
        assert_eq!(count_rows("", 80), 1);
        assert_eq!(count_rows("\n", 80), 2);
    }

    #[test]
    fn exact_fit_does_not_wrap() {
        assert_eq!(count_rows(&"x".repeat(40), 40), 1);
        assert_eq!(count_rows(&"x".repeat(41), 40), 2);
    }

    #[test]
    fn colors_do_not_count() {
        let colored = format!("\x1b[36m{}\x1b[39m", "x".repeat(40));
        assert_eq!(count_rows(&colored, 40), 1);
    }

    #[test]
    fn zero_columns_are_treated_as_one() {
        assert_eq!(count_rows("abc", 0), 3);
    }

    #[test]
    fn measurement_layout() {
        let c = Content {
            indent: 2,
            prefix: "pre",
            text: "text",
            suffix: "suf",
            glyph_width: 1,
        };
        assert_eq!(c.measurement(), "  pre---text-suf");
        assert_eq!(content("foo").measurement(), "--foo");
    }

    #[test]
    fn measurement_matches_real_frame_width() {
        let c = Content {
            indent: 0,
            prefix: "pre",
            text: "text",
            suffix: "suf",
            glyph_width: 1,
        };
        assert_eq!(display_width(&c.measurement()), display_width("pre ⠋ text suf"));
    }

    #[test]
    fn glyph_slot_grows_with_glyph() {
        // "🌑 " frames are three columns, "[    ]" frames six.
        for frame in ["🌑 ", "[    ]", "🦄"] {
            let c = Content {
                text: "x",
                glyph_width: display_width(frame),
                ..Content::default()
            };
            assert_eq!(display_width(&c.measurement()), display_width(&format!("{frame} x")));
        }
    }

    #[test]
    fn wide_glyph_at_exact_fill_wraps() {
        let text = "x".repeat(37);
        let c = Content {
            text: &text,
            glyph_width: display_width("🌑 "),
            ..Content::default()
        };
        assert_eq!(c.line_count(40), 2);
        assert_eq!(c.line_count(41), 1);
    }

    #[test]
    fn single_line() {
        assert_eq!(content("foo").line_count(40), 1);
    }

    #[test]
    fn explicit_newlines() {
        assert_eq!(content("foo\n\nbar").line_count(40), 3);
    }

    #[test]
    fn wrapped_text() {
        assert_eq!(content(&"0".repeat(50)).line_count(40), 2);
    }

    #[test]
    fn wide_glyphs_wrap_sooner() {
        assert_eq!(content(&"🦄".repeat(50)).line_count(40), 3);
        let text = format!("{}\nfoo", "🦄".repeat(38));
        assert_eq!(content(&text).line_count(40), 3);
    }

    #[test]
    fn multi_line_prefix() {
        let c = Content {
            prefix: "foo\n",
            text: "\nbar",
            ..Content::default()
        };
        assert_eq!(c.line_count(40), 3);
    }

    #[test]
    fn indent_pushes_text_onto_next_row() {
        let text = "0".repeat(15);
        let c = Content {
            indent: 15,
            text: &text,
            ..Content::default()
        };
        assert_eq!(c.line_count(20), 2);
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let c = content("some text\nwith 中文");
        assert_eq!(c.line_count(7), c.line_count(7));
    }
}
