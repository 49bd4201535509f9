#![forbid(unsafe_code)]

//! tgfx: a small terminal runtime for character-cell programs.
//!
//! A [`Console`] gives a program a fixed-size screen to draw colored text
//! on and a keyboard to read logical keys from, and puts the terminal
//! back the way it was when dropped.

pub mod console;

// --- Core re-exports -------------------------------------------------------

pub use tgfx_core::color::{Color, Hue, INTENSE};
pub use tgfx_core::config::{BackendChoice, ConsoleConfig, InputChoice};
pub use tgfx_core::error::{Error, Result};
pub use tgfx_core::key::{
    DOWN_ARROW, Key, LEFT_ARROW, NO_KEY, OTHER_KEY, RIGHT_ARROW, UP_ARROW,
};
pub use tgfx_core::key_source::KeySource;

// --- Render re-exports -----------------------------------------------------

pub use tgfx_render::{
    Attribute, AttributeSlot, BufferedBackend, ColorMapper, DirectBackend, ScreenBackend,
};

pub use console::Console;

/// Write formatted text to a [`Console`] in its current colors.
///
/// ```no_run
/// # fn main() -> tgfx::Result<()> {
/// let mut console = tgfx::Console::new();
/// tgfx::cprint!(console, "score: {}", 42)?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! cprint {
    ($console:expr, $($arg:tt)*) => {
        $console.write_fmt(::std::format_args!($($arg)*))
    };
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{Color, Console, ConsoleConfig, Error, Hue, Key, Result, cprint};

    pub use crate::{core, render};
}

pub use tgfx_core as core;
pub use tgfx_render as render;
