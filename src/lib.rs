//! Elegant terminal spinners.
//!
//! A [`Spinner`] draws an animated glyph next to some text and keeps the
//! output tidy: every frame erases exactly the rows the previous frame took,
//! including wrapped lines, explicit newlines and double-width glyphs.
//!
//! ```no_run
//! # fn main() -> twirl::Result<()> {
//! use twirl::{Options, Spinner, SpinnerColor};
//!
//! let spinner = Spinner::new(Options {
//!     text: "Loading unicorns".into(),
//!     color: Some(SpinnerColor::Magenta),
//!     ..Options::default()
//! })?;
//! spinner.start();
//! spinner.set_text("Loading rainbows");
//! spinner.succeed();
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod command;
pub mod discard;
pub mod environment;
pub mod error;
pub mod layout;
pub mod options;
pub mod output;
pub mod promise;
pub mod spinner;
pub mod spinners;
pub mod symbols;
pub mod text;

pub use color::SpinnerColor;
pub use environment::Environment;
pub use error::{Error, Result};
pub use options::Options;
pub use output::{BufferOutput, Output, TerminalOutput};
pub use promise::{Action, Message, PromiseOptions, promise};
pub use spinner::{PersistOptions, Spinner};
pub use spinners::{SpinnerDefinition, SpinnerSelection};
pub use symbols::Symbol;
pub use text::Text;
