//! The spinner: presentation state plus the render/clear engine.
//!
//! Every frame is drawn by first erasing the rows the previous frame
//! occupied, then writing the new frame and remembering how many rows it
//! takes. A background ticker re-renders at the spinner's interval. It runs
//! as a tokio task when a runtime is available and on a plain thread
//! otherwise.

use std::fmt;
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::color::{SpinnerColor, colorize};
use crate::discard;
use crate::environment::Environment;
use crate::error::{Error, Result};
use crate::layout::{Content, DEFAULT_COLUMNS, display_width};
use crate::options::Options;
use crate::output::{Output, TerminalOutput};
use crate::spinners::{DEFAULT_INTERVAL_MS, SpinnerDefinition, SpinnerSelection};
use crate::symbols::Symbol;
use crate::text::Text;

/// Overrides for the line written by [`Spinner::stop_and_persist`].
/// Anything left `None` falls back to the spinner's current value.
#[derive(Debug, Clone, Default)]
pub struct PersistOptions {
    /// Defaults to a single space.
    pub symbol: Option<String>,
    pub text: Option<Text>,
    pub prefix_text: Option<Text>,
    pub suffix_text: Option<Text>,
}

/// An animated progress indicator.
///
/// Cheap to clone; clones control the same spinner.
///
/// ```no_run
/// # fn main() -> twirl::Result<()> {
/// let spinner = twirl::Spinner::new("Loading unicorns")?;
/// spinner.start();
/// // ...work...
/// spinner.succeed_with("Unicorns loaded");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Spinner {
    inner: Arc<Mutex<State>>,
}

enum Cancel {
    Task {
        tx: watch::Sender<bool>,
        handle: JoinHandle<()>,
    },
    Thread(mpsc::Sender<()>),
}

struct Ticker {
    id: u64,
    cancel: Cancel,
}

impl Ticker {
    fn cancel(self) {
        match self.cancel {
            Cancel::Task { tx, handle } => {
                let _ = tx.send(true);
                handle.abort();
            }
            // Dropping the sender wakes the thread with a disconnect.
            Cancel::Thread(tx) => drop(tx),
        }
    }
}

/// Text sources copied out of the state. Closures are evaluated from this
/// copy with the lock released, so they may call back into the spinner.
struct Texts {
    prefix: Text,
    text: Text,
    suffix: Text,
}

impl Texts {
    fn resolve(&self) -> Resolved {
        Resolved {
            prefix: self.prefix.resolve(),
            text: self.text.resolve(),
            suffix: self.suffix.resolve(),
        }
    }
}

/// Text values evaluated once for a single frame.
struct Resolved {
    prefix: String,
    text: String,
    suffix: String,
}

struct State {
    definition: Arc<SpinnerDefinition>,
    frame_index: usize,
    interval_override: Option<u64>,
    text: Text,
    prefix_text: Text,
    suffix_text: Text,
    indent: u16,
    last_indent: u16,
    color: Option<SpinnerColor>,
    enabled: bool,
    silent: bool,
    hide_cursor: bool,
    discard_stdin: bool,
    cursor_hidden: bool,
    discarding: bool,
    /// Rows the current content occupies.
    line_count: usize,
    /// Rows the last drawn frame occupies; the next clear erases these.
    lines_to_clear: usize,
    ticker: Option<Ticker>,
    next_ticker_id: u64,
    environment: Environment,
    output: Box<dyn Output>,
}

impl Spinner {
    /// Create a spinner. Accepts [`Options`] or a bare string used as text.
    pub fn new(options: impl Into<Options>) -> Result<Self> {
        let options = options.into();
        let indent = indent_column(options.indent)?;
        let environment = options.environment;
        let definition = options.spinner.resolve(environment.unicode)?;
        let output = options
            .output
            .unwrap_or_else(|| Box::new(TerminalOutput::stderr()));
        let enabled = options
            .is_enabled
            .unwrap_or_else(|| environment.is_interactive(output.is_terminal()));

        let state = State {
            definition,
            frame_index: 0,
            interval_override: options.interval,
            text: options.text,
            prefix_text: options.prefix_text,
            suffix_text: options.suffix_text,
            indent,
            last_indent: 0,
            color: options.color,
            enabled,
            silent: options.is_silent,
            hide_cursor: options.hide_cursor,
            discard_stdin: options.discard_stdin,
            cursor_hidden: false,
            discarding: false,
            line_count: 0,
            lines_to_clear: 0,
            ticker: None,
            next_ticker_id: 0,
            environment,
            output,
        };
        let spinner = Self {
            inner: Arc::new(Mutex::new(state)),
        };
        spinner.refresh_line_count();
        Ok(spinner)
    }

    fn state(&self) -> MutexGuard<'_, State> {
        lock(&self.inner)
    }

    /// Recount rows for the current content. Dynamic text is evaluated
    /// without the lock held.
    fn refresh_line_count(&self) {
        let texts = self.state().texts();
        let resolved = texts.resolve();
        let mut state = self.state();
        state.line_count = state.count_lines(&resolved);
    }

    // Accessors

    pub fn text(&self) -> Text {
        self.state().text.clone()
    }

    pub fn set_text(&self, text: impl Into<Text>) {
        self.state().text = text.into();
        self.refresh_line_count();
    }

    pub fn prefix_text(&self) -> Text {
        self.state().prefix_text.clone()
    }

    pub fn set_prefix_text(&self, text: impl Into<Text>) {
        self.state().prefix_text = text.into();
        self.refresh_line_count();
    }

    pub fn suffix_text(&self) -> Text {
        self.state().suffix_text.clone()
    }

    pub fn set_suffix_text(&self, text: impl Into<Text>) {
        self.state().suffix_text = text.into();
        self.refresh_line_count();
    }

    pub fn indent(&self) -> usize {
        usize::from(self.state().indent)
    }

    /// Set the column the block starts at. Negative values and values past
    /// the last addressable column (65535) are rejected and leave the
    /// current indent in place.
    pub fn set_indent<T>(&self, indent: T) -> Result<()>
    where
        T: TryInto<usize> + fmt::Display + Copy,
    {
        let value = indent
            .try_into()
            .ok()
            .and_then(|value: usize| u16::try_from(value).ok())
            .ok_or_else(|| Error::InvalidIndent(indent.to_string()))?;
        self.state().indent = value;
        self.refresh_line_count();
        Ok(())
    }

    pub fn color(&self) -> Option<SpinnerColor> {
        self.state().color
    }

    pub fn set_color(&self, color: Option<SpinnerColor>) {
        self.state().color = color;
    }

    pub fn definition(&self) -> Arc<SpinnerDefinition> {
        Arc::clone(&self.state().definition)
    }

    /// Swap the spinner definition. Resets the frame cursor and drops any
    /// interval override; an invalid selection leaves everything as it was.
    pub fn set_spinner(&self, selection: impl Into<SpinnerSelection>) -> Result<()> {
        {
            let mut state = self.state();
            let definition = selection.into().resolve(state.environment.unicode)?;
            tracing::debug!(frames = definition.frames().len(), "spinner definition changed");
            state.definition = definition;
            state.frame_index = 0;
            state.interval_override = None;
        }
        // The glyph slot follows the widest frame.
        self.refresh_line_count();
        Ok(())
    }

    /// Milliseconds between frames: the override, else the definition's
    /// interval, else 100.
    pub fn interval(&self) -> u64 {
        self.state().interval()
    }

    pub fn is_spinning(&self) -> bool {
        self.state().ticker.is_some()
    }

    /// Whether animated output is produced. Always false while silent.
    pub fn is_enabled(&self) -> bool {
        self.state().is_enabled()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.state().enabled = enabled;
    }

    pub fn is_silent(&self) -> bool {
        self.state().silent
    }

    pub fn set_silent(&self, silent: bool) {
        self.state().silent = silent;
    }

    /// Index of the frame the next render will draw.
    pub fn frame_index(&self) -> usize {
        self.state().frame_index
    }

    /// Rows the current content occupies at the output's width.
    pub fn line_count(&self) -> usize {
        self.state().line_count
    }

    /// Rows the next clear will erase.
    pub fn lines_to_clear(&self) -> usize {
        self.state().lines_to_clear
    }

    // Rendering

    /// The next frame as a string. Advances the frame cursor.
    pub fn frame(&self) -> String {
        let texts = self.state().texts();
        let resolved = texts.resolve();
        self.state().compose(&resolved)
    }

    /// Erase the rows drawn by the last render.
    pub fn clear(&self) -> &Self {
        let mut state = self.state();
        state.clear();
        state.flush();
        self
    }

    /// Draw one frame, replacing the previous one.
    pub fn render(&self) -> &Self {
        draw(&self.inner, None);
        self
    }

    // Lifecycle

    /// Start spinning.
    pub fn start(&self) -> &Self {
        self.start_inner(None)
    }

    /// Replace the text, then start spinning.
    pub fn start_with(&self, text: impl Into<Text>) -> &Self {
        self.start_inner(Some(text.into()))
    }

    fn start_inner(&self, text: Option<Text>) -> &Self {
        if let Some(text) = text {
            self.set_text(text);
        }

        let owner = {
            let mut state = self.state();
            if state.silent {
                return self;
            }
            if !state.enabled {
                let text = state.text.clone();
                drop(state);
                let text = text.resolve();
                if !text.is_empty() {
                    let mut state = self.state();
                    state.write(&format!("- {text}\n"));
                    state.flush();
                }
                return self;
            }
            if state.ticker.is_some() {
                return self;
            }

            if state.hide_cursor {
                let result = state.output.hide_cursor();
                report(result);
                state.cursor_hidden = true;
            }
            if state.discard_stdin && discard::is_supported() {
                state.discarding = discard::start();
            }

            let id = state.next_ticker_id;
            state.next_ticker_id += 1;
            let period = Duration::from_millis(state.interval());
            state.ticker = spawn_ticker(Arc::downgrade(&self.inner), id, period);
            tracing::debug!(interval_ms = period.as_millis() as u64, "spinner started");
            state.ticker.as_ref().map(|ticker| ticker.id)
        };
        draw(&self.inner, owner);
        self
    }

    /// Stop spinning and erase the spinner.
    pub fn stop(&self) -> &Self {
        let mut state = self.state();
        state.stop();
        state.flush();
        self
    }

    /// Stop spinning and leave a final line behind.
    pub fn stop_and_persist(&self, options: PersistOptions) -> &Self {
        let texts = {
            let state = self.state();
            if state.silent {
                return self;
            }
            Texts {
                prefix: options
                    .prefix_text
                    .unwrap_or_else(|| state.prefix_text.clone()),
                text: options.text.unwrap_or_else(|| state.text.clone()),
                suffix: options
                    .suffix_text
                    .unwrap_or_else(|| state.suffix_text.clone()),
            }
        };
        let Resolved {
            prefix,
            text,
            suffix,
        } = texts.resolve();
        let symbol = options.symbol.unwrap_or_else(|| " ".to_string());

        let mut line = String::new();
        if !prefix.is_empty() {
            line.push_str(&prefix);
            line.push(' ');
        }
        line.push_str(&symbol);
        line.push(' ');
        line.push_str(&text);
        if !suffix.is_empty() {
            line.push(' ');
            line.push_str(&suffix);
        }
        line.push('\n');

        let mut state = self.state();
        if state.silent {
            return self;
        }
        state.stop();
        state.write(&line);
        state.flush();
        tracing::debug!("spinner persisted");
        self
    }

    fn persist_symbol(&self, symbol: Symbol, text: Option<Text>) -> &Self {
        let unicode = self.state().environment.unicode;
        self.stop_and_persist(PersistOptions {
            symbol: Some(symbol.render(unicode)),
            text,
            ..PersistOptions::default()
        })
    }

    pub fn succeed(&self) -> &Self {
        self.persist_symbol(Symbol::Success, None)
    }

    pub fn succeed_with(&self, text: impl Into<Text>) -> &Self {
        self.persist_symbol(Symbol::Success, Some(text.into()))
    }

    pub fn fail(&self) -> &Self {
        self.persist_symbol(Symbol::Error, None)
    }

    pub fn fail_with(&self, text: impl Into<Text>) -> &Self {
        self.persist_symbol(Symbol::Error, Some(text.into()))
    }

    pub fn warn(&self) -> &Self {
        self.persist_symbol(Symbol::Warning, None)
    }

    pub fn warn_with(&self, text: impl Into<Text>) -> &Self {
        self.persist_symbol(Symbol::Warning, Some(text.into()))
    }

    pub fn info(&self) -> &Self {
        self.persist_symbol(Symbol::Info, None)
    }

    pub fn info_with(&self, text: impl Into<Text>) -> &Self {
        self.persist_symbol(Symbol::Info, Some(text.into()))
    }
}

impl fmt::Debug for Spinner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Spinner")
            .field("text", &state.text)
            .field("frame_index", &state.frame_index)
            .field("indent", &state.indent)
            .field("spinning", &state.ticker.is_some())
            .finish_non_exhaustive()
    }
}

impl State {
    fn is_enabled(&self) -> bool {
        self.enabled && !self.silent
    }

    fn interval(&self) -> u64 {
        self.interval_override
            .or(self.definition.interval())
            .unwrap_or(DEFAULT_INTERVAL_MS)
    }

    fn columns(&self) -> u16 {
        self.output.columns().unwrap_or(DEFAULT_COLUMNS)
    }

    /// `None` is a direct render, which is always allowed.
    fn is_owned_by(&self, ticker: Option<u64>) -> bool {
        ticker.is_none() || self.ticker.as_ref().map(|t| t.id) == ticker
    }

    fn texts(&self) -> Texts {
        Texts {
            prefix: self.prefix_text.clone(),
            text: self.text.clone(),
            suffix: self.suffix_text.clone(),
        }
    }

    fn content<'a>(&self, resolved: &'a Resolved, glyph_width: usize) -> Content<'a> {
        Content {
            indent: usize::from(self.indent),
            prefix: &resolved.prefix,
            text: &resolved.text,
            suffix: &resolved.suffix,
            glyph_width,
        }
    }

    /// Rows for `resolved` with the widest frame in the glyph slot, so the
    /// count is the same whichever frame is up next.
    fn count_lines(&self, resolved: &Resolved) -> usize {
        self.content(resolved, self.definition.width())
            .line_count(self.columns())
    }

    fn compose(&mut self, resolved: &Resolved) -> String {
        let frames = self.definition.frames();
        let glyph = colorize(self.color, &frames[self.frame_index % frames.len()]);
        self.frame_index = (self.frame_index + 1) % frames.len();

        let mut frame = String::new();
        if !resolved.prefix.is_empty() {
            frame.push_str(&resolved.prefix);
            frame.push(' ');
        }
        frame.push_str(&glyph);
        frame.push(' ');
        frame.push_str(&resolved.text);
        if !resolved.suffix.is_empty() {
            frame.push(' ');
            frame.push_str(&resolved.suffix);
        }
        frame
    }

    fn clear(&mut self) {
        if !self.is_enabled() || !self.output.is_terminal() {
            return;
        }
        report(self.output.cursor_to(0));
        for row in 0..self.lines_to_clear {
            if row > 0 {
                report(self.output.move_cursor(0, -1));
            }
            report(self.output.clear_line());
        }
        if self.indent != 0 || self.last_indent != self.indent {
            report(self.output.cursor_to(self.indent));
        }
        self.last_indent = self.indent;
        self.lines_to_clear = 0;
    }

    /// Clear the previous frame and draw the next one from `resolved`, the
    /// texts evaluated once for this frame.
    fn render(&mut self, resolved: &Resolved) {
        if self.silent {
            return;
        }
        self.clear();
        let frames = self.definition.frames();
        let drawn_width = display_width(&frames[self.frame_index % frames.len()]);
        let frame = self.compose(resolved);
        self.write(&frame);
        self.line_count = self.count_lines(resolved);
        // What is on screen, which a narrower frame may draw in fewer rows.
        self.lines_to_clear = self
            .content(resolved, drawn_width)
            .line_count(self.columns());
        self.flush();
        tracing::trace!(rows = self.lines_to_clear, "rendered frame");
    }

    fn stop(&mut self) {
        if !self.is_enabled() {
            return;
        }
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
        self.frame_index = 0;
        self.clear();
        if self.cursor_hidden {
            report(self.output.show_cursor());
            self.cursor_hidden = false;
        }
        if self.discarding {
            discard::stop();
            self.discarding = false;
        }
        tracing::debug!("spinner stopped");
    }

    fn write(&mut self, text: &str) {
        report(self.output.write_str(text));
    }

    fn flush(&mut self) {
        report(self.output.flush());
    }
}

impl Drop for State {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
        if self.cursor_hidden {
            report(self.output.show_cursor());
            report(self.output.flush());
        }
        if self.discarding {
            discard::stop();
        }
    }
}

fn lock(inner: &Mutex<State>) -> MutexGuard<'_, State> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

fn indent_column(indent: usize) -> Result<u16> {
    u16::try_from(indent).map_err(|_| Error::InvalidIndent(indent.to_string()))
}

fn report(result: io::Result<()>) {
    if let Err(e) = result {
        tracing::warn!("spinner output failed: {e}");
    }
}

/// Draw a frame on behalf of `ticker`, or unconditionally for `None`.
/// Dynamic text is evaluated between two lock scopes. Returns false once the
/// ticker no longer owns the spinner.
fn draw(inner: &Mutex<State>, ticker: Option<u64>) -> bool {
    let texts = {
        let state = lock(inner);
        if !state.is_owned_by(ticker) {
            return false;
        }
        if state.silent {
            return true;
        }
        state.texts()
    };
    let resolved = texts.resolve();

    let mut state = lock(inner);
    if !state.is_owned_by(ticker) {
        return false;
    }
    state.render(&resolved);
    true
}

/// Render one tick if `id` still owns the spinner. Returns whether the
/// ticker should keep going.
fn tick(state: &Weak<Mutex<State>>, id: u64) -> bool {
    match state.upgrade() {
        Some(inner) => draw(&inner, Some(id)),
        None => false,
    }
}

fn spawn_ticker(state: Weak<Mutex<State>>, id: u64, period: Duration) -> Option<Ticker> {
    if let Ok(runtime) = tokio::runtime::Handle::try_current() {
        let (tx, mut rx) = watch::channel(false);
        let handle = runtime.spawn(async move {
            loop {
                tokio::select! {
                    _ = tokio::time::sleep(period) => {}
                    _ = rx.changed() => break,
                }
                if !tick(&state, id) {
                    break;
                }
            }
        });
        return Some(Ticker {
            id,
            cancel: Cancel::Task { tx, handle },
        });
    }

    let (tx, rx) = mpsc::channel::<()>();
    let spawned = thread::Builder::new()
        .name("twirl-ticker".to_string())
        .spawn(move || {
            while let Err(RecvTimeoutError::Timeout) = rx.recv_timeout(period) {
                if !tick(&state, id) {
                    break;
                }
            }
        });
    match spawned {
        Ok(_) => Some(Ticker {
            id,
            cancel: Cancel::Thread(tx),
        }),
        Err(e) => {
            tracing::warn!("failed to start spinner ticker: {e}");
            None
        }
    }
}
