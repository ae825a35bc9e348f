//! Errors raised when a spinner is configured with values it cannot honor.
//!
//! All of these surface synchronously at the point of the bad mutation.
//! Rendering itself never fails; write errors are logged and dropped.

/// Everything that can go wrong while configuring a spinner.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("There is no built-in spinner named '{0}'. Run `twirl --list` for the full list")]
    UnknownSpinner(String),

    #[error("The given spinner must have a non-empty `frames` property")]
    MissingFrames,

    #[error("Invalid spinner definition: {0}")]
    MalformedSpinner(String),

    #[error("The `indent` option must be an integer from 0 to 65535 (got '{0}')")]
    InvalidIndent(String),

    #[error("The `{flag}` option must be a boolean (got '{value}')")]
    InvalidFlagType { flag: &'static str, value: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error belongs to the invalid-spinner family
    /// (unknown name, reserved name, missing frames, bad JSON).
    pub fn is_invalid_spinner(&self) -> bool {
        matches!(
            self,
            Self::UnknownSpinner(_) | Self::MissingFrames | Self::MalformedSpinner(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
