#![forbid(unsafe_code)]

//! Color support detection.
//!
//! Decides, from the environment alone, how many attribute slots the
//! terminal can show. A terminal that cannot render color gets zero
//! slots, so every pair falls back to the default attribute and no color
//! SGR is ever sent to it.
//!
//! | Condition | Result |
//! |-----------|--------|
//! | Windows console, or `WT_SESSION` set | color |
//! | `TERM` empty or `dumb` | no color |
//! | `COLORTERM` set | color |
//! | `TERM` ending in `-m` / `-mono`, or a `vt*` without `color` | no color |
//! | anything else | color (ANSI 8-color) |
//!
//! When in doubt the terminal is assumed to speak ANSI, since a lone
//! SGR on a monochrome emulator is harmless and missing colors are not.

use std::env;

use crate::config::DEFAULT_COLOR_SLOTS;

#[derive(Debug, Clone, Default)]
struct DetectInputs {
    term: String,
    colorterm: String,
    wt_session: bool,
    windows_console: bool,
}

impl DetectInputs {
    fn from_env() -> Self {
        Self {
            term: env::var("TERM").unwrap_or_default(),
            colorterm: env::var("COLORTERM").unwrap_or_default(),
            wt_session: env::var("WT_SESSION").is_ok(),
            windows_console: cfg!(windows),
        }
    }
}

/// What the terminal can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalCapabilities {
    /// The terminal renders the 8 ANSI colors.
    pub colors: bool,
    /// Non-default attribute slots available.
    pub color_slots: usize,
}

impl TerminalCapabilities {
    /// An 8-color ANSI terminal.
    #[must_use]
    pub const fn ansi8() -> Self {
        Self {
            colors: true,
            color_slots: DEFAULT_COLOR_SLOTS,
        }
    }

    /// A terminal without color.
    #[must_use]
    pub const fn monochrome() -> Self {
        Self {
            colors: false,
            color_slots: 0,
        }
    }

    /// Detect from `TERM`, `COLORTERM` and `WT_SESSION`.
    #[must_use]
    pub fn detect() -> Self {
        let caps = Self::detect_from_inputs(&DetectInputs::from_env());
        #[cfg(feature = "tracing")]
        tracing::debug!(
            colors = caps.colors,
            color_slots = caps.color_slots,
            "terminal capabilities detected"
        );
        caps
    }

    fn detect_from_inputs(env: &DetectInputs) -> Self {
        if env.windows_console || env.wt_session {
            return Self::ansi8();
        }

        let term = env.term.as_str();
        if term.is_empty() || term == "dumb" {
            return Self::monochrome();
        }
        if !env.colorterm.is_empty() {
            return Self::ansi8();
        }
        let is_mono = term.ends_with("-m")
            || term.ends_with("-mono")
            || (term.starts_with("vt") && !term.contains("color"));
        if is_mono {
            return Self::monochrome();
        }
        Self::ansi8()
    }
}
