//! Capability probes for the process environment.
//!
//! These decide defaults only: whether extended glyphs can be drawn and
//! whether animation should be on when the caller did not say.

/// What the surrounding environment can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    /// The terminal can draw Unicode spinner glyphs and symbols.
    pub unicode: bool,
    /// Running under a CI service.
    pub ci: bool,
    /// `TERM=dumb`: no cursor movement.
    pub dumb: bool,
}

impl Environment {
    /// Probe the real process environment.
    pub fn detect() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok(), cfg!(windows))
    }

    /// Probe using a custom environment lookup (for tests).
    pub fn from_env_with<F>(get_env: F, windows: bool) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let term = get_env("TERM").unwrap_or_default();
        Self {
            unicode: detect_unicode(&get_env, &term, windows),
            ci: get_env("CI").is_some(),
            dumb: term == "dumb",
        }
    }

    /// A fully capable interactive terminal. Handy for tests.
    pub fn capable() -> Self {
        Self {
            unicode: true,
            ci: false,
            dumb: false,
        }
    }

    /// Whether a terminal output should animate by default.
    pub fn is_interactive(&self, is_terminal: bool) -> bool {
        is_terminal && !self.dumb && !self.ci
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::detect()
    }
}

/// Terminal programs on Windows known to render Unicode.
const WINDOWS_UNICODE_TERM_PROGRAMS: &[&str] = &["Terminus-Sublime", "vscode"];

/// `TERM` values on Windows known to render Unicode.
const WINDOWS_UNICODE_TERMS: &[&str] = &[
    "xterm-256color",
    "alacritty",
    "rxvt-unicode",
    "rxvt-unicode-256color",
];

fn detect_unicode<F>(get_env: &F, term: &str, windows: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    if !windows {
        // The Linux virtual console has no wide font.
        return term != "linux";
    }

    get_env("CI").is_some()
        || get_env("WT_SESSION").is_some()
        || get_env("TERMINUS_SUBLIME").is_some()
        || get_env("ConEmuTask").as_deref() == Some("{cmd::Cmder}")
        || get_env("TERM_PROGRAM")
            .is_some_and(|p| WINDOWS_UNICODE_TERM_PROGRAMS.contains(&p.as_str()))
        || WINDOWS_UNICODE_TERMS.contains(&term)
        || get_env("TERMINAL_EMULATOR").as_deref() == Some("JetBrains-JediTerm")
}
