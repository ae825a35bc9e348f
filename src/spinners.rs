//! Spinner definitions and the built-in named catalog.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::display_width;

/// Name used when no spinner is requested.
pub const DEFAULT_SPINNER: &str = "dots";

/// ASCII-safe spinner used when the terminal cannot draw extended glyphs.
pub const FALLBACK_SPINNER: &str = "line";

/// Reserved name that is never resolvable through the catalog.
const RESERVED_NAME: &str = "default";

/// Effective interval when neither an override nor the definition sets one.
pub const DEFAULT_INTERVAL_MS: u64 = 100;

/// An ordered set of frames plus a suggested tick interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpinnerDefinition {
    frames: Vec<String>,
    interval: Option<u64>,
}

impl SpinnerDefinition {
    pub fn new<I, S>(frames: I, interval: Option<u64>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let frames: Vec<String> = frames.into_iter().map(Into::into).collect();
        if frames.is_empty() {
            return Err(Error::MissingFrames);
        }
        if interval == Some(0) {
            return Err(Error::MalformedSpinner(
                "`interval` must be a positive number of milliseconds".to_string(),
            ));
        }
        Ok(Self { frames, interval })
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn interval(&self) -> Option<u64> {
        self.interval
    }

    /// Columns taken by the widest frame.
    pub fn width(&self) -> usize {
        self.frames
            .iter()
            .map(|frame| display_width(frame))
            .max()
            .unwrap_or(0)
    }
}

/// A caller-supplied definition as it arrives from config or JSON, before
/// validation. `frames` is optional here so its absence can be reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawDefinition {
    pub frames: Option<Vec<String>>,
    pub interval: Option<u64>,
}

impl TryFrom<RawDefinition> for SpinnerDefinition {
    type Error = Error;

    fn try_from(raw: RawDefinition) -> Result<Self> {
        let frames = raw.frames.ok_or(Error::MissingFrames)?;
        SpinnerDefinition::new(frames, raw.interval)
    }
}

/// What the caller asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SpinnerSelection {
    /// No preference; resolves to [`DEFAULT_SPINNER`].
    #[default]
    Default,
    /// Look the name up in the built-in catalog.
    Named(String),
    /// Use these frames verbatim.
    Custom(RawDefinition),
}

impl SpinnerSelection {
    /// Parse a JSON object such as `{"frames": ["-", "+"], "interval": 80}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawDefinition =
            serde_json::from_str(json).map_err(|e| Error::MalformedSpinner(e.to_string()))?;
        Ok(Self::Custom(raw))
    }

    /// Resolve to a concrete definition.
    ///
    /// Custom frames are trusted as given. Any other selection is replaced
    /// by [`FALLBACK_SPINNER`] when `unicode` is false.
    pub fn resolve(&self, unicode: bool) -> Result<Arc<SpinnerDefinition>> {
        match self {
            Self::Custom(raw) => Ok(Arc::new(SpinnerDefinition::try_from(raw.clone())?)),
            _ if !unicode => builtin(FALLBACK_SPINNER),
            Self::Default => builtin(DEFAULT_SPINNER),
            Self::Named(name) if name == RESERVED_NAME => Err(Error::UnknownSpinner(name.clone())),
            Self::Named(name) => builtin(name),
        }
    }
}

impl From<&str> for SpinnerSelection {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for SpinnerSelection {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<SpinnerDefinition> for SpinnerSelection {
    fn from(def: SpinnerDefinition) -> Self {
        Self::Custom(RawDefinition {
            frames: Some(def.frames),
            interval: def.interval,
        })
    }
}

struct Entry {
    name: &'static str,
    interval: u64,
    frames: &'static [&'static str],
}

#[rustfmt::skip]
const CATALOG: &[Entry] = &[
    Entry { name: "dots", interval: 80, frames: &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"] },
    Entry { name: "dots2", interval: 80, frames: &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"] },
    Entry { name: "dots3", interval: 80, frames: &["⠋", "⠙", "⠚", "⠞", "⠖", "⠦", "⠴", "⠲", "⠳", "⠓"] },
    Entry { name: "dots4", interval: 80, frames: &["⠄", "⠆", "⠇", "⠋", "⠙", "⠸", "⠰", "⠠", "⠰", "⠸", "⠙", "⠋", "⠇", "⠆"] },
    Entry { name: "dots5", interval: 80, frames: &["⠋", "⠙", "⠚", "⠒", "⠂", "⠂", "⠒", "⠲", "⠴", "⠦", "⠖", "⠒", "⠐", "⠐", "⠒", "⠓", "⠋"] },
    Entry {
        name: "dots6",
        interval: 80,
        frames: &[
            "⠁", "⠉", "⠙", "⠚", "⠒", "⠂", "⠂", "⠒", "⠲", "⠴", "⠤", "⠄",
            "⠄", "⠤", "⠴", "⠲", "⠒", "⠂", "⠂", "⠒", "⠚", "⠙", "⠉", "⠁",
        ],
    },
    Entry {
        name: "dots7",
        interval: 80,
        frames: &[
            "⠈", "⠉", "⠋", "⠓", "⠒", "⠐", "⠐", "⠒", "⠖", "⠦", "⠤", "⠠",
            "⠠", "⠤", "⠦", "⠖", "⠒", "⠐", "⠐", "⠒", "⠓", "⠋", "⠉", "⠈",
        ],
    },
    Entry {
        name: "dots8",
        interval: 80,
        frames: &[
            "⠁", "⠁", "⠉", "⠙", "⠚", "⠒", "⠂", "⠂", "⠒", "⠲", "⠴", "⠤", "⠄", "⠄", "⠤",
            "⠠", "⠠", "⠤", "⠦", "⠖", "⠒", "⠐", "⠐", "⠒", "⠓", "⠋", "⠉", "⠈", "⠈",
        ],
    },
    Entry { name: "dots9", interval: 80, frames: &["⢹", "⢺", "⢼", "⣸", "⣇", "⡧", "⡗", "⡏"] },
    Entry { name: "dots10", interval: 80, frames: &["⢄", "⢂", "⢁", "⡁", "⡈", "⡐", "⡠"] },
    Entry { name: "dots11", interval: 100, frames: &["⠁", "⠂", "⠄", "⡀", "⢀", "⠠", "⠐", "⠈"] },
    Entry {
        name: "dots12",
        interval: 80,
        frames: &[
            "⢀⠀", "⡀⠀", "⠄⠀", "⢂⠀", "⡂⠀", "⠅⠀", "⢃⠀", "⡃⠀", "⠍⠀", "⢋⠀", "⡋⠀", "⠍⠁", "⢋⠁", "⡋⠁",
            "⠍⠉", "⠋⠉", "⠋⠉", "⠉⠙", "⠉⠙", "⠉⠩", "⠈⢙", "⠈⡙", "⢈⠩", "⡀⢙", "⠄⡙", "⢂⠩", "⡂⢘", "⠅⡘",
            "⢃⠨", "⡃⢐", "⠍⡐", "⢋⠠", "⡋⢀", "⠍⡁", "⢋⠁", "⡋⠁", "⠍⠉", "⠋⠉", "⠋⠉", "⠉⠙", "⠉⠙", "⠉⠩",
            "⠈⢙", "⠈⡙", "⠈⠩", "⠀⢙", "⠀⡙", "⠀⠩", "⠀⢘", "⠀⡘", "⠀⠨", "⠀⢐", "⠀⡐", "⠀⠠", "⠀⢀", "⠀⡀",
        ],
    },
    Entry { name: "dots13", interval: 80, frames: &["⣼", "⣹", "⢻", "⠿", "⡟", "⣏", "⣧", "⣶"] },
    Entry { name: "line", interval: 130, frames: &["-", "\\", "|", "/"] },
    Entry { name: "line2", interval: 100, frames: &["⠂", "-", "–", "—", "–", "-"] },
    Entry { name: "pipe", interval: 100, frames: &["┤", "┘", "┴", "└", "├", "┌", "┬", "┐"] },
    Entry { name: "simpleDots", interval: 400, frames: &[".  ", ".. ", "...", "   "] },
    Entry { name: "simpleDotsScrolling", interval: 200, frames: &[".  ", ".. ", "...", " ..", "  .", "   "] },
    Entry { name: "star", interval: 70, frames: &["✶", "✸", "✹", "✺", "✹", "✷"] },
    Entry { name: "star2", interval: 80, frames: &["+", "x", "*"] },
    Entry { name: "flip", interval: 70, frames: &["_", "_", "_", "-", "`", "`", "'", "´", "-", "_", "_", "_"] },
    Entry { name: "hamburger", interval: 100, frames: &["☱", "☲", "☴"] },
    Entry { name: "growVertical", interval: 120, frames: &["▁", "▃", "▄", "▅", "▆", "▇", "▆", "▅", "▄", "▃"] },
    Entry { name: "growHorizontal", interval: 120, frames: &["▏", "▎", "▍", "▌", "▋", "▊", "▉", "▊", "▋", "▌", "▍", "▎"] },
    Entry { name: "balloon", interval: 140, frames: &[" ", ".", "o", "O", "@", "*", " "] },
    Entry { name: "balloon2", interval: 120, frames: &[".", "o", "O", "°", "O", "o", "."] },
    Entry { name: "noise", interval: 100, frames: &["▓", "▒", "░"] },
    Entry { name: "bounce", interval: 120, frames: &["⠁", "⠂", "⠄", "⠂"] },
    Entry { name: "boxBounce", interval: 120, frames: &["▖", "▘", "▝", "▗"] },
    Entry { name: "boxBounce2", interval: 100, frames: &["▌", "▀", "▐", "▄"] },
    Entry { name: "triangle", interval: 50, frames: &["◢", "◣", "◤", "◥"] },
    Entry {
        name: "binary",
        interval: 80,
        frames: &[
            "010010", "001100", "100101", "111010", "111101",
            "010111", "101011", "111000", "110011", "110101",
        ],
    },
    Entry { name: "arc", interval: 100, frames: &["◜", "◠", "◝", "◞", "◡", "◟"] },
    Entry { name: "circle", interval: 120, frames: &["◡", "⊙", "◠"] },
    Entry { name: "squareCorners", interval: 180, frames: &["◰", "◳", "◲", "◱"] },
    Entry { name: "circleQuarters", interval: 120, frames: &["◴", "◷", "◶", "◵"] },
    Entry { name: "circleHalves", interval: 50, frames: &["◐", "◓", "◑", "◒"] },
    Entry { name: "squish", interval: 100, frames: &["╫", "╪"] },
    Entry { name: "toggle", interval: 250, frames: &["⊶", "⊷"] },
    Entry { name: "toggle2", interval: 80, frames: &["▫", "▪"] },
    Entry { name: "toggle3", interval: 120, frames: &["□", "■"] },
    Entry { name: "toggle4", interval: 100, frames: &["■", "□", "▪", "▫"] },
    Entry { name: "toggle5", interval: 100, frames: &["▮", "▯"] },
    Entry { name: "toggle6", interval: 300, frames: &["ဝ", "၀"] },
    Entry { name: "toggle7", interval: 80, frames: &["⦾", "⦿"] },
    Entry { name: "toggle8", interval: 100, frames: &["◍", "◌"] },
    Entry { name: "toggle9", interval: 100, frames: &["◉", "◎"] },
    Entry { name: "toggle10", interval: 100, frames: &["㊂", "㊀", "㊁"] },
    Entry { name: "toggle11", interval: 50, frames: &["⧇", "⧆"] },
    Entry { name: "toggle12", interval: 120, frames: &["☗", "☖"] },
    Entry { name: "toggle13", interval: 80, frames: &["=", "*", "-"] },
    Entry { name: "arrow", interval: 100, frames: &["←", "↖", "↑", "↗", "→", "↘", "↓", "↙"] },
    Entry {
        name: "arrow2",
        interval: 80,
        frames: &[
            "⬆\u{fe0f} ", "↗\u{fe0f} ", "➡\u{fe0f} ", "↘\u{fe0f} ",
            "⬇\u{fe0f} ", "↙\u{fe0f} ", "⬅\u{fe0f} ", "↖\u{fe0f} ",
        ],
    },
    Entry { name: "arrow3", interval: 120, frames: &["▹▹▹▹▹", "▸▹▹▹▹", "▹▸▹▹▹", "▹▹▸▹▹", "▹▹▹▸▹", "▹▹▹▹▸"] },
    Entry {
        name: "bouncingBar",
        interval: 80,
        frames: &[
            "[    ]", "[=   ]", "[==  ]", "[=== ]", "[ ===]", "[  ==]", "[   =]", "[    ]",
            "[   =]", "[  ==]", "[ ===]", "[====]", "[=== ]", "[==  ]", "[=   ]",
        ],
    },
    Entry {
        name: "bouncingBall",
        interval: 80,
        frames: &[
            "( ●    )", "(  ●   )", "(   ●  )", "(    ● )", "(     ●)",
            "(    ● )", "(   ●  )", "(  ●   )", "( ●    )", "(●     )",
        ],
    },
    Entry { name: "smiley", interval: 200, frames: &["😄 ", "😝 "] },
    Entry { name: "monkey", interval: 300, frames: &["🙈 ", "🙈 ", "🙉 ", "🙊 "] },
    Entry { name: "hearts", interval: 100, frames: &["💛 ", "💙 ", "💜 ", "💚 ", "❤\u{fe0f} "] },
    Entry {
        name: "clock",
        interval: 100,
        frames: &["🕛 ", "🕐 ", "🕑 ", "🕒 ", "🕓 ", "🕔 ", "🕕 ", "🕖 ", "🕗 ", "🕘 ", "🕙 ", "🕚 "],
    },
    Entry { name: "moon", interval: 80, frames: &["🌑 ", "🌒 ", "🌓 ", "🌔 ", "🌕 ", "🌖 ", "🌗 ", "🌘 "] },
    Entry { name: "earth", interval: 180, frames: &["🌍 ", "🌎 ", "🌏 "] },
    Entry { name: "runner", interval: 140, frames: &["🚶 ", "🏃 "] },
    Entry { name: "dqpb", interval: 100, frames: &["d", "q", "p", "b"] },
    Entry {
        name: "weather",
        interval: 100,
        frames: &[
            "☀\u{fe0f} ", "☀\u{fe0f} ", "☀\u{fe0f} ", "🌤 ", "⛅\u{fe0f} ", "🌥 ", "☁\u{fe0f} ", "🌧 ",
            "🌨 ", "🌧 ", "🌨 ", "🌧 ", "🌨 ", "⛈ ", "🌨 ", "🌧 ", "🌨 ", "☁\u{fe0f} ", "🌥 ",
            "⛅\u{fe0f} ", "🌤 ", "☀\u{fe0f} ", "☀\u{fe0f} ",
        ],
    },
    Entry { name: "christmas", interval: 400, frames: &["🌲", "🎄"] },
    Entry {
        name: "grenade",
        interval: 80,
        frames: &[
            "،  ", "′  ", " ´ ", " ‾ ", "  ⸌", "  ⸊", "  |",
            "  ⁎", "  ⁕", " ෴ ", "  ⁓", "   ", "   ", "   ",
        ],
    },
    Entry { name: "layer", interval: 150, frames: &["-", "=", "≡"] },
    Entry { name: "point", interval: 125, frames: &["∙∙∙", "●∙∙", "∙●∙", "∙∙●", "∙∙∙"] },
    Entry {
        name: "betaWave",
        interval: 80,
        frames: &["ρββββββ", "βρβββββ", "ββρββββ", "βββρβββ", "ββββρββ", "βββββρβ", "ββββββρ"],
    },
    Entry { name: "fingerDance", interval: 160, frames: &["🤘 ", "🤟 ", "🖖 ", "✋ ", "🤚 ", "👆 "] },
    Entry {
        name: "mindblown",
        interval: 160,
        frames: &[
            "😐 ", "😐 ", "😮 ", "😮 ", "😦 ", "😦 ", "😧 ",
            "😧 ", "🤯 ", "💥 ", "✨ ", "\u{3000} ", "\u{3000} ", "\u{3000} ",
        ],
    },
    Entry { name: "speaker", interval: 160, frames: &["🔈 ", "🔉 ", "🔊 ", "🔉 "] },
    Entry { name: "orangePulse", interval: 100, frames: &["🔸 ", "🔶 ", "🟠 ", "🟠 ", "🔶 "] },
    Entry { name: "bluePulse", interval: 100, frames: &["🔹 ", "🔷 ", "🔵 ", "🔵 ", "🔷 "] },
    Entry {
        name: "orangeBluePulse",
        interval: 100,
        frames: &["🔸 ", "🔶 ", "🟠 ", "🟠 ", "🔶 ", "🔹 ", "🔷 ", "🔵 ", "🔵 ", "🔷 "],
    },
    Entry {
        name: "timeTravel",
        interval: 100,
        frames: &["🕛 ", "🕚 ", "🕙 ", "🕘 ", "🕗 ", "🕖 ", "🕕 ", "🕔 ", "🕓 ", "🕒 ", "🕑 ", "🕐 "],
    },
    Entry {
        name: "aesthetic",
        interval: 80,
        frames: &[
            "▰▱▱▱▱▱▱", "▰▰▱▱▱▱▱", "▰▰▰▱▱▱▱", "▰▰▰▰▱▱▱",
            "▰▰▰▰▰▱▱", "▰▰▰▰▰▰▱", "▰▰▰▰▰▰▰", "▰▱▱▱▱▱▱",
        ],
    },
];

/// Look up a built-in definition by name.
pub fn get(name: &str) -> Option<SpinnerDefinition> {
    if name == RESERVED_NAME {
        return None;
    }
    CATALOG.iter().find(|e| e.name == name).map(|e| SpinnerDefinition {
        frames: e.frames.iter().map(|f| f.to_string()).collect(),
        interval: Some(e.interval),
    })
}

/// Names of every built-in definition, in catalog order.
pub fn names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|e| e.name)
}

fn builtin(name: &str) -> Result<Arc<SpinnerDefinition>> {
    get(name)
        .map(Arc::new)
        .ok_or_else(|| Error::UnknownSpinner(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_frames_are_non_empty() {
        for entry in CATALOG {
            assert!(!entry.frames.is_empty(), "{} has no frames", entry.name);
            assert!(entry.interval > 0, "{} has no interval", entry.name);
        }
    }

    #[test]
    fn catalog_names_are_unique() {
        let mut all: Vec<_> = names().collect();
        let before = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), before);
    }

    #[test]
    fn catalog_covers_the_common_sets() {
        assert!(names().count() >= 70);
        for name in ["dots12", "toggle13", "clock", "hearts", "weather", "timeTravel"] {
            assert!(get(name).is_some(), "{name} is missing");
        }
    }

    #[test]
    fn width_is_the_widest_frame() {
        assert_eq!(get("dots").unwrap().width(), 1);
        assert_eq!(get("moon").unwrap().width(), 3);
        assert_eq!(get("bouncingBar").unwrap().width(), 6);
        let mixed = SpinnerDefinition::new(["-", "🦄", "\x1b[31m+\x1b[39m"], None).unwrap();
        assert_eq!(mixed.width(), 2);
    }

    #[test]
    fn default_selection_is_dots() {
        let def = SpinnerSelection::Default.resolve(true).unwrap();
        assert_eq!(def.frames()[0], "⠋");
        assert_eq!(def.interval(), Some(80));
    }

    #[test]
    fn named_lookup() {
        let def = SpinnerSelection::from("layer").resolve(true).unwrap();
        assert_eq!(def.interval(), Some(150));
        assert_eq!(def.frames(), ["-", "=", "≡"]);
    }

    #[test]
    fn reserved_name_is_rejected() {
        let err = SpinnerSelection::from("default").resolve(true).unwrap_err();
        assert!(matches!(err, Error::UnknownSpinner(ref n) if n == "default"));
        assert!(get("default").is_none());
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = SpinnerSelection::from("random-string-12345")
            .resolve(true)
            .unwrap_err();
        assert!(err.to_string().contains("no built-in spinner"));
    }

    #[test]
    fn low_capability_overrides_named_and_default() {
        let line = get(FALLBACK_SPINNER).unwrap();
        assert_eq!(*SpinnerSelection::from("moon").resolve(false).unwrap(), line);
        assert_eq!(*SpinnerSelection::Default.resolve(false).unwrap(), line);
        // The placeholder name is not an error once the fallback kicks in.
        assert_eq!(*SpinnerSelection::from("default").resolve(false).unwrap(), line);
    }

    #[test]
    fn custom_frames_are_trusted_in_low_capability() {
        let selection = SpinnerSelection::Custom(RawDefinition {
            frames: Some(vec!["🦄".to_string()]),
            interval: None,
        });
        let def = selection.resolve(false).unwrap();
        assert_eq!(def.frames(), ["🦄"]);
        assert_eq!(def.interval(), None);
    }

    #[test]
    fn custom_without_frames_is_rejected() {
        let selection = SpinnerSelection::Custom(RawDefinition::default());
        assert!(matches!(selection.resolve(true), Err(Error::MissingFrames)));
    }

    #[test]
    fn empty_frames_are_rejected() {
        assert!(matches!(
            SpinnerDefinition::new(Vec::<String>::new(), None),
            Err(Error::MissingFrames)
        ));
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(SpinnerDefinition::new(["a"], Some(0)).is_err());
    }

    #[test]
    fn json_selection() {
        let selection = SpinnerSelection::from_json(r#"{"frames": ["a", "b"], "interval": 42}"#).unwrap();
        let def = selection.resolve(true).unwrap();
        assert_eq!(def.frames(), ["a", "b"]);
        assert_eq!(def.interval(), Some(42));
    }

    #[test]
    fn json_without_frames_fails_on_resolve() {
        let selection = SpinnerSelection::from_json(r#"{"interval": 42}"#).unwrap();
        assert!(selection.resolve(true).unwrap_err().is_invalid_spinner());
    }

    #[test]
    fn malformed_json_is_invalid_spinner() {
        let err = SpinnerSelection::from_json("[1, 2").unwrap_err();
        assert!(err.is_invalid_spinner());
    }
}
