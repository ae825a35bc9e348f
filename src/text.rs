//! Text shown around the spinner glyph.

use std::fmt;
use std::sync::Arc;

/// Either a fixed string or a closure evaluated on every render, for live
/// content such as elapsed time or a progress count.
#[derive(Clone)]
pub enum Text {
    Literal(String),
    Dynamic(Arc<dyn Fn() -> String + Send + Sync>),
}

impl Text {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(f))
    }

    /// The current value. Dynamic text is evaluated now.
    pub fn resolve(&self) -> String {
        match self {
            Self::Literal(s) => s.clone(),
            Self::Dynamic(f) => f(),
        }
    }

    /// A literal empty string. Dynamic text is never considered empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Literal(s) if s.is_empty())
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::Literal(String::new())
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl PartialEq<&str> for Text {
    fn eq(&self, other: &&str) -> bool {
        matches!(self, Self::Literal(s) if s == other)
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Self::Literal(s.to_string())
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Self::Literal(s)
    }
}

impl From<&String> for Text {
    fn from(s: &String) -> Self {
        Self::Literal(s.clone())
    }
}

/// `None` clears the text.
impl<T: Into<Text>> From<Option<T>> for Text {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
