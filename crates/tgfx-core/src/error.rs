#![forbid(unsafe_code)]

//! Error type shared by the tgfx crates.

use std::fmt;
use std::io;

/// Failures surfaced by the console runtime.
///
/// Only initialization can fail in ways the caller cannot fix: once the
/// runtime is up, the remaining errors are I/O errors talking to the
/// terminal. Missing input, exhausted color slots, out-of-range cursor
/// positions and unknown escape sequences are never errors.
#[derive(Debug)]
pub enum Error {
    /// The terminal could not be set up (size query, display handle,
    /// input mode). Fatal: there is no degraded mode.
    Init(String),
    /// Another live console already owns the terminal in this process.
    AlreadyActive,
    /// I/O failure during terminal operations.
    Io(io::Error),
}

impl Error {
    /// Wrap an I/O error that happened while initializing.
    #[must_use]
    pub fn init(context: &str, err: &io::Error) -> Self {
        Self::Init(format!("{context}: {err}"))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "terminal initialization failed: {msg}"),
            Self::AlreadyActive => write!(f, "a console is already active in this process"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for tgfx APIs.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_error_carries_context() {
        let err = Error::init("query size", &io::Error::other("no tty"));
        assert_eq!(
            err.to_string(),
            "terminal initialization failed: query size: no tty"
        );
    }

    #[test]
    fn io_errors_convert_and_expose_source() {
        let err: Error = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(err, Error::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
        assert!(std::error::Error::source(&Error::AlreadyActive).is_none());
    }
}
