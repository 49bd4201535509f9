#![forbid(unsafe_code)]

//! Console configuration.
//!
//! Defaults pick the platform's natural backend pair: direct writes with
//! byte decoding on Unix, a buffered grid with event records elsewhere.
//! [`ConsoleConfig::from_env`] lets users override that without
//! recompiling:
//!
//! | Variable | Values | Effect |
//! |----------|--------|--------|
//! | `TGFX_BACKEND` | `direct`, `buffered` | force the screen backend |
//! | `TGFX_INPUT` | `bytes`, `events` | force the key source |
//! | `TGFX_COLOR_SLOTS` | integer | cap the attribute-slot capacity |
//! | `NO_COLOR` | any | capacity 0, everything renders in default colors |

use std::env;

/// Environment variable selecting the screen backend.
pub const ENV_BACKEND: &str = "TGFX_BACKEND";
/// Environment variable selecting the key source.
pub const ENV_INPUT: &str = "TGFX_INPUT";
/// Environment variable overriding the attribute-slot capacity.
pub const ENV_COLOR_SLOTS: &str = "TGFX_COLOR_SLOTS";

/// Slots available to an 8-color terminal: 64 color pairs minus the
/// default pair 0, which covers all 63 non-default combinations.
pub const DEFAULT_COLOR_SLOTS: usize = 63;

/// Which screen backend to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendChoice {
    /// Direct on Unix, buffered elsewhere.
    #[default]
    Auto,
    /// Every drawing operation is written to the terminal immediately.
    Direct,
    /// Drawing goes to an off-screen grid, shown on flush.
    Buffered,
}

impl BackendChoice {
    /// Resolve `Auto` for the current platform.
    #[must_use]
    pub const fn resolve(self) -> Self {
        match self {
            Self::Auto if cfg!(unix) => Self::Direct,
            Self::Auto => Self::Buffered,
            other => other,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "direct" => Some(Self::Direct),
            "buffered" => Some(Self::Buffered),
            _ => None,
        }
    }
}

/// Where keys come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputChoice {
    /// Bytes on Unix, event records elsewhere.
    #[default]
    Auto,
    /// Raw terminal bytes through the escape decoder (Unix only).
    Bytes,
    /// Platform key-event records.
    Events,
}

impl InputChoice {
    /// Resolve `Auto` for the current platform. `Bytes` falls back to
    /// `Events` where no raw byte source exists.
    #[must_use]
    pub const fn resolve(self) -> Self {
        match self {
            Self::Auto | Self::Bytes if cfg!(unix) => Self::Bytes,
            Self::Auto | Self::Bytes => Self::Events,
            Self::Events => Self::Events,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "bytes" => Some(Self::Bytes),
            "events" => Some(Self::Events),
            _ => None,
        }
    }
}

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Screen backend selection.
    pub backend: BackendChoice,
    /// Key source selection.
    pub input: InputChoice,
    /// Upper bound on attribute slots; `None` uses the backend's capacity.
    pub color_slots: Option<usize>,
    /// Draw on the alternate screen, restoring the original on exit.
    pub alternate_screen: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            backend: BackendChoice::Auto,
            input: InputChoice::Auto,
            color_slots: None,
            alternate_screen: true,
        }
    }
}

impl ConsoleConfig {
    /// Defaults overridden by `TGFX_*` and `NO_COLOR`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_inputs(&EnvInputs::from_env())
    }

    fn from_inputs(env: &EnvInputs) -> Self {
        let mut config = Self::default();

        if let Some(value) = env.backend.as_deref() {
            match BackendChoice::parse(value) {
                Some(choice) => config.backend = choice,
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(value, "ignoring unknown {ENV_BACKEND}");
                }
            }
        }

        if let Some(value) = env.input.as_deref() {
            match InputChoice::parse(value) {
                Some(choice) => config.input = choice,
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(value, "ignoring unknown {ENV_INPUT}");
                }
            }
        }

        if let Some(value) = env.color_slots.as_deref() {
            match value.trim().parse::<usize>() {
                Ok(slots) => config.color_slots = Some(slots),
                Err(_) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(value, "ignoring malformed {ENV_COLOR_SLOTS}");
                }
            }
        }

        if env.no_color {
            config.color_slots = Some(0);
        }

        config
    }

    #[must_use]
    pub fn with_backend(mut self, backend: BackendChoice) -> Self {
        self.backend = backend;
        self
    }

    #[must_use]
    pub fn with_input(mut self, input: InputChoice) -> Self {
        self.input = input;
        self
    }

    #[must_use]
    pub fn with_color_slots(mut self, slots: usize) -> Self {
        self.color_slots = Some(slots);
        self
    }

    #[must_use]
    pub fn with_alternate_screen(mut self, enabled: bool) -> Self {
        self.alternate_screen = enabled;
        self
    }

    /// Slot capacity to use given what the backend supports.
    #[must_use]
    pub fn effective_color_slots(&self, backend_capacity: usize) -> usize {
        self.color_slots
            .map_or(backend_capacity, |slots| slots.min(backend_capacity))
    }
}

#[derive(Debug, Clone, Default)]
struct EnvInputs {
    backend: Option<String>,
    input: Option<String>,
    color_slots: Option<String>,
    no_color: bool,
}

impl EnvInputs {
    fn from_env() -> Self {
        Self {
            backend: env::var(ENV_BACKEND).ok(),
            input: env::var(ENV_INPUT).ok(),
            color_slots: env::var(ENV_COLOR_SLOTS).ok(),
            no_color: env::var("NO_COLOR").is_ok(),
        }
    }
}
