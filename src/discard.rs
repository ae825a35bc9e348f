//! Swallowing keystrokes while a spinner is animating.
//!
//! Typed characters would otherwise be echoed into the middle of the frame
//! and break row accounting. Stdin is put in raw mode and drained on a
//! background thread. This is process-wide state, so it is reference counted
//! across spinners: the first `start` enables it, the last `stop` restores
//! the terminal.

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, terminal};

/// How often the reader wakes up to check whether it should exit.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Exit status used when Ctrl+C arrives while input is discarded.
const INTERRUPTED_EXIT_CODE: i32 = 130;

struct Reader {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

struct Discarder {
    active: usize,
    reader: Option<Reader>,
}

static DISCARDER: Mutex<Discarder> = Mutex::new(Discarder {
    active: 0,
    reader: None,
});

/// Whether discarding is possible at all for this process.
pub fn is_supported() -> bool {
    io::stdin().is_terminal()
}

/// Begin discarding. Returns `true` if this call took a reference that must
/// later be released with [`stop`].
pub fn start() -> bool {
    if !is_supported() {
        return false;
    }
    let mut discarder = DISCARDER.lock().unwrap_or_else(PoisonError::into_inner);
    if discarder.active == 0 {
        if let Err(e) = terminal::enable_raw_mode() {
            tracing::debug!("cannot discard stdin: {e}");
            return false;
        }
        discarder.reader = Some(spawn_reader());
        tracing::debug!("stdin discarding started");
    }
    discarder.active += 1;
    true
}

/// Release a reference taken by [`start`].
pub fn stop() {
    let mut discarder = DISCARDER.lock().unwrap_or_else(PoisonError::into_inner);
    if discarder.active == 0 {
        return;
    }
    discarder.active -= 1;
    if discarder.active > 0 {
        return;
    }
    if let Some(reader) = discarder.reader.take() {
        reader.stop.store(true, Ordering::SeqCst);
        let _ = reader.handle.join();
    }
    if let Err(e) = terminal::disable_raw_mode() {
        tracing::warn!("failed to restore terminal mode: {e}");
    }
    tracing::debug!("stdin discarding stopped");
}

fn spawn_reader() -> Reader {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let handle = thread::spawn(move || {
        while !flag.load(Ordering::SeqCst) {
            match event::poll(POLL_INTERVAL) {
                Ok(true) => {
                    if let Ok(event) = event::read() {
                        if is_interrupt(&event) {
                            interrupt();
                        }
                    }
                }
                Ok(false) => {}
                Err(_) => break,
            }
        }
    });
    Reader { stop, handle }
}

fn is_interrupt(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) if modifiers.contains(KeyModifiers::CONTROL)
    )
}

/// Raw mode swallows SIGINT, so Ctrl+C is honored by hand: put the terminal
/// back the way it was and exit like the default signal handler would.
fn interrupt() -> ! {
    let _ = terminal::disable_raw_mode();
    let mut stderr = io::stderr();
    let _ = execute!(stderr, cursor::Show);
    let _ = stderr.write_all(b"\n");
    std::process::exit(INTERRUPTED_EXIT_CODE);
}
