#![forbid(unsafe_code)]

//! Logical key alphabet.
//!
//! Every input backend reduces keystrokes to a [`Key`]. "No input
//! available" is expressed as `Option::<Key>::None` by the callers.

/// Legacy code for [`Key::Left`].
pub const LEFT_ARROW: i32 = 128;
/// Legacy code for [`Key::Right`].
pub const RIGHT_ARROW: i32 = 129;
/// Legacy code for [`Key::Up`].
pub const UP_ARROW: i32 = 130;
/// Legacy code for [`Key::Down`].
pub const DOWN_ARROW: i32 = 131;
/// Legacy code for [`Key::Other`].
pub const OTHER_KEY: i32 = 255;
/// Legacy "no key pending" code.
pub const NO_KEY: i32 = -1;

/// A decoded, platform-independent keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A raw input byte (printable characters, control codes, or bytes
    /// drained from an unrecognized escape sequence).
    Char(u8),
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// A key with no representation in this alphabet.
    Other,
}

impl Key {
    /// Legacy integer code: the byte value for [`Key::Char`], otherwise
    /// one of the `*_ARROW` / [`OTHER_KEY`] constants.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Char(b) => b as i32,
            Self::Left => LEFT_ARROW,
            Self::Right => RIGHT_ARROW,
            Self::Up => UP_ARROW,
            Self::Down => DOWN_ARROW,
            Self::Other => OTHER_KEY,
        }
    }

    /// Legacy code for an optional key ([`NO_KEY`] when absent).
    #[must_use]
    pub const fn code_or_none(key: Option<Self>) -> i32 {
        match key {
            Some(key) => key.code(),
            None => NO_KEY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_codes() {
        assert_eq!(Key::Char(b'a').code(), 97);
        assert_eq!(Key::Left.code(), 128);
        assert_eq!(Key::Right.code(), 129);
        assert_eq!(Key::Up.code(), 130);
        assert_eq!(Key::Down.code(), 131);
        assert_eq!(Key::Other.code(), 255);
        assert_eq!(Key::code_or_none(None), -1);
    }
}
