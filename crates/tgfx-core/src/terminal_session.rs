#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! [`TerminalSession`] switches the terminal into the mode a console
//! needs and puts it back when dropped.
//!
//! # Lifecycle Guarantees
//!
//! 1. **Input mode** - On Unix the controlling terminal leaves canonical
//!    mode and stops echoing, while signal keys (Ctrl+C) keep working. The
//!    original termios is saved and restored. Elsewhere crossterm's raw
//!    mode is used.
//!
//! 2. **Drop restores previous state** - attributes are reset, the cursor
//!    is shown, the alternate screen is left, and the input mode is
//!    restored last.
//!
//! 3. **Best-effort on abnormal exit** - a panic hook and, on Unix, a
//!    SIGINT/SIGTERM watcher thread run the same restoration before the
//!    process goes away. Neither is guaranteed (e.g. `SIGKILL`).
//!
//! # Cleanup Order
//!
//! 1. Reset SGR attributes
//! 2. Show cursor
//! 3. Leave alternate screen (if entered)
//! 4. Restore input mode
//! 5. Flush stdout

use std::io::{self, Write};
use std::sync::OnceLock;

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Terminal session configuration options.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Enter the alternate screen buffer (`CSI ? 1049 h`).
    pub alternate_screen: bool,
}

/// An active terminal session.
///
/// # Contract
///
/// - **Exclusive ownership**: Only one `TerminalSession` should exist at a
///   time. Creating multiple sessions will cause undefined terminal
///   behavior.
/// - **Cleanup guarantee**: When dropped (normally or via panic), the
///   terminal is returned to the state it was in before `new`.
#[derive(Debug)]
pub struct TerminalSession {
    alternate_screen_enabled: bool,
    #[cfg(unix)]
    input_mode: Option<InputModeGuard>,
    #[cfg(not(unix))]
    raw_mode_enabled: bool,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl TerminalSession {
    /// Switch the input mode and optionally enter the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the input mode cannot be changed or the
    /// alternate screen cannot be entered. Anything already changed is
    /// restored before returning.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        #[cfg(unix)]
        let input_mode = InputModeGuard::enter()?;
        #[cfg(not(unix))]
        crossterm::terminal::enable_raw_mode()?;
        #[cfg(feature = "tracing")]
        tracing::info!("terminal input mode switched");

        let mut session = Self {
            alternate_screen_enabled: false,
            #[cfg(unix)]
            input_mode: Some(input_mode),
            #[cfg(not(unix))]
            raw_mode_enabled: true,
            #[cfg(unix)]
            signal_guard: Some(SignalGuard::new()?),
        };

        if options.alternate_screen {
            crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
            session.alternate_screen_enabled = true;
            #[cfg(feature = "tracing")]
            tracing::info!("alternate screen enabled");
        }

        Ok(session)
    }

    fn cleanup(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();

        let mut stdout = io::stdout();

        let _ = crossterm::execute!(
            stdout,
            crossterm::style::SetAttribute(crossterm::style::Attribute::Reset),
            crossterm::cursor::Show
        );

        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
            #[cfg(feature = "tracing")]
            tracing::info!("alternate screen disabled");
        }

        #[cfg(unix)]
        drop(self.input_mode.take());
        #[cfg(not(unix))]
        if self.raw_mode_enabled {
            let _ = crossterm::terminal::disable_raw_mode();
            self.raw_mode_enabled = false;
        }
        #[cfg(feature = "tracing")]
        tracing::info!("terminal input mode restored");

        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Size of the controlling terminal as (columns, rows), queried without
/// changing any terminal state.
///
/// # Errors
///
/// Fails when the size cannot be queried (not a terminal).
pub fn terminal_size() -> io::Result<(u16, u16)> {
    crossterm::terminal::size()
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();

    let _ = crossterm::execute!(
        stdout,
        crossterm::style::SetAttribute(crossterm::style::Attribute::Reset),
        crossterm::cursor::Show,
        crossterm::terminal::LeaveAlternateScreen
    );
    #[cfg(unix)]
    InputModeGuard::restore_saved();
    #[cfg(not(unix))]
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

// ── Input mode (Unix) ────────────────────────────────────────────────────

/// Termios saved by the live guard, for the panic/signal paths that
/// cannot reach the guard itself.
#[cfg(unix)]
static SAVED_TERMIOS: std::sync::Mutex<Option<nix::sys::termios::Termios>> =
    std::sync::Mutex::new(None);

/// RAII guard for the cbreak-style input mode: no line buffering, no
/// echo, signals still delivered. Restores the original termios on drop.
#[cfg(unix)]
#[derive(Debug)]
struct InputModeGuard {
    original: nix::sys::termios::Termios,
    tty: std::fs::File,
}

#[cfg(unix)]
impl InputModeGuard {
    fn enter() -> io::Result<Self> {
        use nix::sys::termios::{
            LocalFlags, SetArg, SpecialCharacterIndices, tcgetattr, tcsetattr,
        };

        let tty = std::fs::File::options()
            .read(true)
            .write(true)
            .open("/dev/tty")?;
        let original = tcgetattr(&tty).map_err(io::Error::other)?;

        let mut cbreak = original.clone();
        cbreak
            .local_flags
            .remove(LocalFlags::ICANON | LocalFlags::ECHO);
        cbreak.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
        cbreak.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;
        tcsetattr(&tty, SetArg::TCSANOW, &cbreak).map_err(io::Error::other)?;

        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = Some(original.clone());
        }

        Ok(Self { original, tty })
    }

    fn restore_saved() {
        let Ok(mut saved) = SAVED_TERMIOS.lock() else {
            return;
        };
        if let Some(original) = saved.take()
            && let Ok(tty) = std::fs::File::open("/dev/tty")
        {
            let _ = nix::sys::termios::tcsetattr(
                &tty,
                nix::sys::termios::SetArg::TCSANOW,
                &original,
            );
        }
    }
}

#[cfg(unix)]
impl Drop for InputModeGuard {
    fn drop(&mut self) {
        let _ = nix::sys::termios::tcsetattr(
            &self.tty,
            nix::sys::termios::SetArg::TCSANOW,
            &self.original,
        );
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = None;
        }
    }
}

// ── Signals (Unix) ───────────────────────────────────────────────────────

#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            if let Some(signal) = signals.forever().next() {
                #[cfg(feature = "tracing")]
                tracing::warn!(signal, "termination signal received, restoring terminal");
                best_effort_cleanup();
                std::process::exit(128 + signal);
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_options_default_is_inline() {
        let opts = SessionOptions::default();
        assert!(!opts.alternate_screen);
    }

    #[cfg(unix)]
    #[test]
    fn restore_without_saved_state_is_a_noop() {
        InputModeGuard::restore_saved();
        assert!(SAVED_TERMIOS.lock().unwrap().is_none());
    }

    // Entering the input mode for real would disturb the test runner's
    // terminal; that path is exercised by running a console interactively.
}
