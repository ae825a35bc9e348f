//! Construction options and the `TWIRL_*` environment overlay.

use std::fmt;

use crate::color::SpinnerColor;
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::output::Output;
use crate::spinners::SpinnerSelection;
use crate::text::Text;

/// Color used when none is configured.
pub const DEFAULT_COLOR: SpinnerColor = SpinnerColor::Cyan;

/// Everything a spinner can be created with.
///
/// ```
/// use twirl::{Options, SpinnerColor};
///
/// let options = Options {
///     text: "Loading unicorns".into(),
///     color: Some(SpinnerColor::Yellow),
///     ..Options::default()
/// };
/// # let _ = options;
/// ```
pub struct Options {
    pub text: Text,
    pub prefix_text: Text,
    pub suffix_text: Text,
    pub spinner: SpinnerSelection,
    /// `None` draws the glyph uncolored.
    pub color: Option<SpinnerColor>,
    pub hide_cursor: bool,
    pub indent: usize,
    /// Overrides the definition's own interval (milliseconds).
    pub interval: Option<u64>,
    /// Defaults to standard error.
    pub output: Option<Box<dyn Output>>,
    /// Defaults to "output is an interactive terminal outside CI".
    pub is_enabled: Option<bool>,
    pub is_silent: bool,
    pub discard_stdin: bool,
    pub environment: Environment,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            text: Text::default(),
            prefix_text: Text::default(),
            suffix_text: Text::default(),
            spinner: SpinnerSelection::Default,
            color: Some(DEFAULT_COLOR),
            hide_cursor: true,
            indent: 0,
            interval: None,
            output: None,
            is_enabled: None,
            is_silent: false,
            discard_stdin: true,
            environment: Environment::detect(),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("text", &self.text)
            .field("prefix_text", &self.prefix_text)
            .field("suffix_text", &self.suffix_text)
            .field("spinner", &self.spinner)
            .field("color", &self.color)
            .field("hide_cursor", &self.hide_cursor)
            .field("indent", &self.indent)
            .field("interval", &self.interval)
            .field("is_enabled", &self.is_enabled)
            .field("is_silent", &self.is_silent)
            .field("discard_stdin", &self.discard_stdin)
            .finish_non_exhaustive()
    }
}

impl From<&str> for Options {
    fn from(text: &str) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

impl From<String> for Options {
    fn from(text: String) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

impl Options {
    /// Send output somewhere other than standard error.
    pub fn with_output(mut self, output: impl Output + 'static) -> Self {
        self.output = Some(Box::new(output));
        self
    }

    /// Overlay settings from the real process environment.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay `TWIRL_*` settings from a custom lookup (for tests).
    ///
    /// Unset variables leave the current value alone.
    pub fn apply_env_with<F>(mut self, get_env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = get_env("TWIRL_SPINNER") {
            self.spinner = parse_spinner(&value)?;
            // Fail now rather than on first render.
            self.spinner.resolve(self.environment.unicode)?;
        }
        if let Some(value) = get_env("TWIRL_COLOR") {
            self.color = parse_color(&value)?;
        }
        if let Some(value) = get_env("TWIRL_INDENT") {
            self.indent = parse_indent(&value)?;
        }
        if let Some(value) = get_env("TWIRL_INTERVAL") {
            self.interval = Some(parse_interval(&value)?);
        }
        if let Some(value) = get_env("TWIRL_ENABLED") {
            self.is_enabled = Some(parse_flag("isEnabled", &value)?);
        }
        if let Some(value) = get_env("TWIRL_SILENT") {
            self.is_silent = parse_flag("isSilent", &value)?;
        }
        if let Some(value) = get_env("TWIRL_HIDE_CURSOR") {
            self.hide_cursor = parse_flag("hideCursor", &value)?;
        }
        if let Some(value) = get_env("TWIRL_DISCARD_STDIN") {
            self.discard_stdin = parse_flag("discardStdin", &value)?;
        }
        Ok(self)
    }
}

/// A catalog name, or a JSON definition when the value starts with `{`.
pub fn parse_spinner(value: &str) -> Result<SpinnerSelection> {
    let value = value.trim();
    if value.starts_with('{') {
        SpinnerSelection::from_json(value)
    } else {
        Ok(SpinnerSelection::from(value))
    }
}

/// A color name; `none`, `false` or empty disables coloring.
pub fn parse_color(value: &str) -> Result<Option<SpinnerColor>> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "none" | "false" => Ok(None),
        other => other.parse().map(Some).map_err(Error::InvalidArgument),
    }
}

/// A column from 0 to 65535. Empty means zero.
pub fn parse_indent(value: &str) -> Result<usize> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse::<u16>()
        .map(usize::from)
        .map_err(|_| Error::InvalidIndent(value.to_string()))
}

pub fn parse_interval(value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(ms),
        _ => Err(Error::InvalidArgument(format!(
            "interval must be a positive number of milliseconds (got '{value}')"
        ))),
    }
}

/// A strict boolean: `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`.
pub fn parse_flag(flag: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidFlagType {
            flag,
            value: value.to_string(),
        }),
    }
}
