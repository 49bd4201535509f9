#![forbid(unsafe_code)]

//! The console: one handle owning the terminal for a program's lifetime.
//!
//! A [`Console`] starts uninitialized. The first operation of any kind
//! queries the terminal size, takes over the terminal (input mode and,
//! by default, the alternate screen), builds the screen backend and key
//! source, and sizes the color mapper. Dropping the console restores the
//! terminal.
//!
//! # Contract
//!
//! - At most one initialized console per process; a second one fails
//!   with [`Error::AlreadyActive`] until the first is dropped.
//! - `Console` is neither `Send` nor `Sync`: exactly one thread drives it.
//! - Initialization failures are fatal. The console stays uninitialized
//!   and every later operation retries and fails the same way.

use std::fmt;
use std::io;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tgfx_core::color::Color;
use tgfx_core::config::{BackendChoice, ConsoleConfig, InputChoice};
use tgfx_core::error::{Error, Result};
use tgfx_core::key::Key;
use tgfx_core::key_source::{EventKeySource, KeySource};
use tgfx_core::terminal_capabilities::TerminalCapabilities;
use tgfx_core::terminal_session::{self, SessionOptions, TerminalSession};
use tgfx_render::{Attribute, BufferedBackend, ColorMapper, DirectBackend, ScreenBackend};
use tracing::{debug, info};

#[cfg(unix)]
use tgfx_core::byte_source::TtySource;
#[cfg(unix)]
use tgfx_core::key_source::ByteKeySource;

/// Set while a terminal-owning console is alive.
static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Process-wide claim on the terminal, released on drop.
#[derive(Debug)]
struct ActiveClaim;

impl ActiveClaim {
    fn acquire() -> Result<Self> {
        ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self)
            .map_err(|_| Error::AlreadyActive)
    }
}

impl Drop for ActiveClaim {
    fn drop(&mut self) {
        ACTIVE.store(false, Ordering::Release);
    }
}

/// Everything an initialized console owns.
struct RuntimeState {
    backend: Box<dyn ScreenBackend>,
    keys: Box<dyn KeySource>,
    palette: ColorMapper,
    fg: Color,
    bg: Color,
    attribute: Attribute,
    width: u16,
    height: u16,
    // Dropped after the fields above, restoring the terminal before the
    // claim is released.
    session: Option<TerminalSession>,
    claim: Option<ActiveClaim>,
}

impl RuntimeState {
    fn init(config: &ConsoleConfig) -> Result<Self> {
        let claim = ActiveClaim::acquire()?;

        let (width, height) = terminal_session::terminal_size()
            .map_err(|e| Error::init("query terminal size", &e))?;

        let session = TerminalSession::new(SessionOptions {
            alternate_screen: config.alternate_screen,
        })
        .map_err(|e| Error::init("acquire terminal", &e))?;

        let caps = TerminalCapabilities::detect();
        let backend_choice = config.backend.resolve();
        let backend: Box<dyn ScreenBackend> = match backend_choice {
            BackendChoice::Direct => Box::new(
                DirectBackend::new(io::stdout(), width, height)
                    .with_attribute_capacity(caps.color_slots),
            ),
            BackendChoice::Buffered | BackendChoice::Auto => Box::new(
                BufferedBackend::new(io::stdout(), width, height)
                    .with_attribute_capacity(caps.color_slots),
            ),
        };
        let input_choice = config.input.resolve();
        let keys = open_key_source(input_choice)?;

        let mut state = Self::assemble(backend, keys, config);
        state.session = Some(session);
        state.claim = Some(claim);
        state.backend.clear()?;

        info!(
            width,
            height,
            backend = ?backend_choice,
            input = ?input_choice,
            colors = caps.colors,
            color_slots = state.palette.capacity(),
            "console initialized"
        );
        Ok(state)
    }

    fn assemble(
        backend: Box<dyn ScreenBackend>,
        keys: Box<dyn KeySource>,
        config: &ConsoleConfig,
    ) -> Self {
        let (width, height) = backend.size();
        let palette = ColorMapper::new(config.effective_color_slots(backend.attribute_capacity()));
        Self {
            backend,
            keys,
            palette,
            fg: Color::GRAY,
            bg: Color::BLACK,
            attribute: Attribute::DEFAULT,
            width,
            height,
            session: None,
            claim: None,
        }
    }
}

impl Drop for RuntimeState {
    fn drop(&mut self) {
        debug!(
            slots_available = self.palette.capacity(),
            slots_created = self.palette.allocated(),
            fallbacks = self.palette.fallbacks(),
            "console shutting down"
        );
    }
}

fn open_key_source(choice: InputChoice) -> Result<Box<dyn KeySource>> {
    match choice {
        #[cfg(unix)]
        InputChoice::Bytes => {
            let tty = TtySource::open().map_err(|e| Error::init("open /dev/tty", &e))?;
            Ok(Box::new(ByteKeySource::new(tty)))
        }
        _ => Ok(Box::new(EventKeySource::new())),
    }
}

/// Handle to the terminal: drawing, colors, and keyboard input.
///
/// ```no_run
/// use tgfx::{Color, Console, ConsoleConfig, Key, cprint};
///
/// fn main() -> tgfx::Result<()> {
///     Console::run(ConsoleConfig::from_env(), |console| {
///         let (width, height) = (console.screen_width()?, console.screen_height()?);
///         console.change_color(Color::YELLOW.intense(), Color::BLUE)?;
///         cprint!(console, "{width} x {height}")?;
///         console.update()?;
///         while console.wait_keypress()? != Key::Char(b'q') {}
///         Ok(())
///     })
/// }
/// ```
pub struct Console {
    config: ConsoleConfig,
    state: Option<RuntimeState>,
    _not_send: PhantomData<*const ()>,
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    /// Console with the default configuration. Does not touch the
    /// terminal until the first operation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ConsoleConfig::default())
    }

    #[must_use]
    pub fn with_config(config: ConsoleConfig) -> Self {
        Self {
            config,
            state: None,
            _not_send: PhantomData,
        }
    }

    /// Already-initialized console over the given backend and key
    /// source, with no terminal session and no process-wide claim.
    #[must_use]
    pub fn headless(
        backend: impl ScreenBackend + 'static,
        keys: impl KeySource + 'static,
    ) -> Self {
        Self::headless_with_config(backend, keys, ConsoleConfig::default())
    }

    /// [`Console::headless`] with the color-slot limit taken from `config`.
    #[must_use]
    pub fn headless_with_config(
        backend: impl ScreenBackend + 'static,
        keys: impl KeySource + 'static,
        config: ConsoleConfig,
    ) -> Self {
        let state = RuntimeState::assemble(Box::new(backend), Box::new(keys), &config);
        debug!(
            width = state.width,
            height = state.height,
            color_slots = state.palette.capacity(),
            "headless console created"
        );
        Self {
            config,
            state: Some(state),
            _not_send: PhantomData,
        }
    }

    /// Run `f` with a fresh console; the terminal is restored on every
    /// exit path, including `?` and panics.
    ///
    /// # Errors
    ///
    /// Whatever `f` returns, including initialization failures from its
    /// first console operation.
    pub fn run<T>(config: ConsoleConfig, f: impl FnOnce(&mut Console) -> Result<T>) -> Result<T> {
        let mut console = Self::with_config(config);
        f(&mut console)
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    fn state(&mut self) -> Result<&mut RuntimeState> {
        let state = match self.state.take() {
            Some(state) => state,
            None => RuntimeState::init(&self.config)?,
        };
        Ok(self.state.insert(state))
    }

    /// Blank the screen and home the cursor.
    ///
    /// # Errors
    ///
    /// Initialization or terminal I/O failures.
    pub fn clear_screen(&mut self) -> Result<()> {
        self.state()?.backend.clear()?;
        Ok(())
    }

    /// Move the cursor; out-of-range coordinates are clamped.
    ///
    /// # Errors
    ///
    /// Initialization or terminal I/O failures.
    pub fn move_cursor(&mut self, row: i32, col: i32) -> Result<()> {
        self.state()?.backend.move_cursor(row, col)?;
        Ok(())
    }

    /// Set the colors used by subsequent writes. Text already on screen
    /// keeps its colors.
    ///
    /// # Errors
    ///
    /// Initialization failures.
    pub fn change_color(&mut self, fg: Color, bg: Color) -> Result<()> {
        let state = self.state()?;
        state.attribute = state.palette.attribute(fg, bg);
        state.fg = fg;
        state.bg = bg;
        Ok(())
    }

    /// Current drawing colors as (foreground, background).
    ///
    /// # Errors
    ///
    /// Initialization failures.
    pub fn colors(&mut self) -> Result<(Color, Color)> {
        let state = self.state()?;
        Ok((state.fg, state.bg))
    }

    /// Rows on screen; fixed for the console's lifetime.
    ///
    /// # Errors
    ///
    /// Initialization failures.
    pub fn screen_height(&mut self) -> Result<u16> {
        Ok(self.state()?.height)
    }

    /// Columns on screen; fixed for the console's lifetime.
    ///
    /// # Errors
    ///
    /// Initialization failures.
    pub fn screen_width(&mut self) -> Result<u16> {
        Ok(self.state()?.width)
    }

    /// Cursor as (row, col).
    ///
    /// # Errors
    ///
    /// Initialization failures.
    pub fn cursor(&mut self) -> Result<(u16, u16)> {
        Ok(self.state()?.backend.cursor())
    }

    /// Next key if one is pending; never waits.
    ///
    /// # Errors
    ///
    /// Initialization or input I/O failures. Nothing pending is `Ok(None)`.
    pub fn poll_keypress(&mut self) -> Result<Option<Key>> {
        Ok(self.state()?.keys.poll_key()?)
    }

    /// Wait for the next key.
    ///
    /// # Errors
    ///
    /// Initialization or input I/O failures.
    pub fn wait_keypress(&mut self) -> Result<Key> {
        Ok(self.state()?.keys.wait_key()?)
    }

    /// Suspend the calling thread.
    ///
    /// # Errors
    ///
    /// Initialization failures.
    pub fn sleep_ms(&mut self, ms: u64) -> Result<()> {
        self.state()?;
        std::thread::sleep(Duration::from_millis(ms));
        Ok(())
    }

    /// Write text at the cursor in the current colors.
    ///
    /// # Errors
    ///
    /// Initialization or terminal I/O failures.
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        let state = self.state()?;
        state
            .backend
            .write_text(text, state.attribute, &state.palette)?;
        Ok(())
    }

    /// Write formatted text; lets `write!` and [`cprint!`](crate::cprint)
    /// target a console.
    ///
    /// # Errors
    ///
    /// Initialization or terminal I/O failures.
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<()> {
        match args.as_str() {
            Some(text) => self.write_str(text),
            None => self.write_str(&args.to_string()),
        }
    }

    /// Make pending drawing visible.
    ///
    /// # Errors
    ///
    /// Initialization or terminal I/O failures.
    pub fn update(&mut self) -> Result<()> {
        let state = self.state()?;
        state.backend.flush(&state.palette)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tgfx_core::byte_source::SliceSource;
    use tgfx_core::key_source::ByteKeySource;

    #[test]
    fn second_claim_is_refused_until_first_drops() {
        let first = ActiveClaim::acquire().unwrap();
        assert!(matches!(ActiveClaim::acquire(), Err(Error::AlreadyActive)));
        drop(first);
        let again = ActiveClaim::acquire().unwrap();
        drop(again);
    }

    #[test]
    fn new_console_is_lazy() {
        let console = Console::new();
        assert!(!console.is_initialized());
        assert!(format!("{console:?}").contains("initialized: false"));
    }

    #[test]
    fn headless_console_starts_in_default_colors() {
        let mut console = Console::headless(
            DirectBackend::new(Vec::new(), 8, 2),
            ByteKeySource::new(SliceSource::new()),
        );
        assert!(console.is_initialized());
        assert_eq!(console.colors().unwrap(), (Color::GRAY, Color::BLACK));
        assert_eq!(console.state().unwrap().attribute, Attribute::DEFAULT);
    }

    #[test]
    fn headless_config_caps_color_slots() {
        let mut console = Console::headless_with_config(
            BufferedBackend::new(Vec::new(), 8, 2),
            ByteKeySource::new(SliceSource::new()),
            ConsoleConfig::default().with_color_slots(3),
        );
        assert_eq!(console.state().unwrap().palette.capacity(), 3);
    }

    #[test]
    fn monochrome_capacity_keeps_the_default_attribute() {
        let caps = TerminalCapabilities::monochrome();
        let mut console = Console::headless(
            DirectBackend::new(Vec::new(), 8, 2).with_attribute_capacity(caps.color_slots),
            ByteKeySource::new(SliceSource::new()),
        );
        console.change_color(Color::RED, Color::BLUE).unwrap();
        let state = console.state().unwrap();
        assert_eq!(state.palette.capacity(), 0);
        assert_eq!(state.attribute, Attribute::DEFAULT);
    }
}
