#![forbid(unsafe_code)]

//! Screen backend abstraction.
//!
//! A [`ScreenBackend`] is the output half of a console: it knows the
//! screen size, tracks the cursor, and turns text plus an [`Attribute`]
//! into terminal output. Two implementations exist, selected once when a
//! console starts:
//!
//! - [`crate::direct::DirectBackend`]: every operation reaches the
//!   terminal immediately.
//! - [`crate::buffered::BufferedBackend`]: operations mutate an
//!   off-screen grid that [`ScreenBackend::flush`] pushes out.
//!
//! Dimensions are fixed for the backend's lifetime; cursor positions are
//! always inside `[0, height) x [0, width)`.
//!
//! After a character lands in the last column, the buffered backend has
//! already wrapped (and scrolled, on the bottom row), while the direct
//! backend reports the last column until the next character arrives,
//! matching the terminal's own pending-wrap state.

use std::io;

use crate::palette::{Attribute, ColorMapper};

/// Output operations shared by all backends.
pub trait ScreenBackend {
    /// Screen size as `(width, height)`.
    fn size(&self) -> (u16, u16);

    /// Non-default attribute slots this backend can render.
    fn attribute_capacity(&self) -> usize;

    /// Blank the screen in the default attribute and home the cursor.
    fn clear(&mut self) -> io::Result<()>;

    /// Move the cursor, clamping out-of-range coordinates to the nearest
    /// edge.
    fn move_cursor(&mut self, row: i32, col: i32) -> io::Result<()>;

    /// Cursor as `(row, col)`.
    fn cursor(&self) -> (u16, u16);

    /// Write text at the cursor in `attribute`, wrapping at the right
    /// edge. `\n`, `\r`, `\t` and backspace move the cursor; every other
    /// byte outside printable ASCII is drawn as `?`.
    fn write_text(
        &mut self,
        text: &str,
        attribute: Attribute,
        palette: &ColorMapper,
    ) -> io::Result<()>;

    /// Make everything drawn so far visible.
    fn flush(&mut self, palette: &ColorMapper) -> io::Result<()>;
}

impl<B: ScreenBackend + ?Sized> ScreenBackend for Box<B> {
    fn size(&self) -> (u16, u16) {
        (**self).size()
    }

    fn attribute_capacity(&self) -> usize {
        (**self).attribute_capacity()
    }

    fn clear(&mut self) -> io::Result<()> {
        (**self).clear()
    }

    fn move_cursor(&mut self, row: i32, col: i32) -> io::Result<()> {
        (**self).move_cursor(row, col)
    }

    fn cursor(&self) -> (u16, u16) {
        (**self).cursor()
    }

    fn write_text(
        &mut self,
        text: &str,
        attribute: Attribute,
        palette: &ColorMapper,
    ) -> io::Result<()> {
        (**self).write_text(text, attribute, palette)
    }

    fn flush(&mut self, palette: &ColorMapper) -> io::Result<()> {
        (**self).flush(palette)
    }
}

/// Distance between tab stops.
pub const TAB_WIDTH: u16 = 8;

const BACKSPACE: u8 = 0x08;

/// What a byte of text does to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextByte {
    /// `\n`: column 0 of the next row.
    Newline,
    /// `\r`: column 0 of the current row.
    CarriageReturn,
    /// `\t`: next tab stop, stopping at the last column.
    Tab,
    /// `\x08`: one column left, stopping at column 0.
    Backspace,
    /// Anything else, drawn as this printable byte.
    Glyph(u8),
}

impl TextByte {
    /// Classify a byte. Other control bytes, DEL, and non-ASCII bytes
    /// draw as `?` so nothing but known sequences reaches the terminal.
    pub(crate) fn classify(byte: u8) -> Self {
        match byte {
            b'\n' => Self::Newline,
            b'\r' => Self::CarriageReturn,
            b'\t' => Self::Tab,
            BACKSPACE => Self::Backspace,
            _ => Self::Glyph(glyph(byte)),
        }
    }
}

/// Printable form of a cell byte.
pub(crate) fn glyph(byte: u8) -> u8 {
    if (0x20..0x7F).contains(&byte) {
        byte
    } else {
        b'?'
    }
}

/// What happened when the cursor moved past a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Advance {
    /// Still on screen.
    Moved,
    /// Ran past the bottom row; the cursor stays on the last row and the
    /// content must scroll up one row.
    Scrolled,
}

/// Cursor bounded by a fixed screen size.
///
/// Two wrapping models share it. [`Cursor::advance`] wraps as soon as a
/// character lands in the last column (the off-screen grid).
/// [`Cursor::advance_held`] holds in the last column with a pending wrap
/// that the next character resolves, the way a terminal does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub(crate) row: u16,
    pub(crate) col: u16,
    width: u16,
    height: u16,
    wrap_pending: bool,
}

impl Cursor {
    pub(crate) fn new(width: u16, height: u16) -> Self {
        Self {
            row: 0,
            col: 0,
            width: width.max(1),
            height: height.max(1),
            wrap_pending: false,
        }
    }

    pub(crate) fn home(&mut self) {
        self.row = 0;
        self.col = 0;
        self.wrap_pending = false;
    }

    pub(crate) fn position(&self) -> (u16, u16) {
        (self.row, self.col)
    }

    /// Move to `(row, col)`, clamped into the screen.
    pub(crate) fn set_clamped(&mut self, row: i32, col: i32) {
        self.row = clamp_axis(row, self.height);
        self.col = clamp_axis(col, self.width);
        self.wrap_pending = false;
    }

    /// Step right after writing a character, wrapping at the right edge.
    pub(crate) fn advance(&mut self) -> Advance {
        self.col += 1;
        if self.col < self.width {
            return Advance::Moved;
        }
        self.newline()
    }

    /// Step right after writing a character, holding in the last column.
    pub(crate) fn advance_held(&mut self) {
        if self.col + 1 < self.width {
            self.col += 1;
        } else {
            self.wrap_pending = true;
        }
    }

    /// Perform a held wrap before the next character is drawn.
    pub(crate) fn resolve_pending_wrap(&mut self) -> Option<Advance> {
        if self.wrap_pending {
            Some(self.newline())
        } else {
            None
        }
    }

    /// Column 0 of the next row.
    pub(crate) fn newline(&mut self) -> Advance {
        self.wrap_pending = false;
        self.col = 0;
        if self.row + 1 < self.height {
            self.row += 1;
            Advance::Moved
        } else {
            Advance::Scrolled
        }
    }

    pub(crate) fn carriage_return(&mut self) {
        self.wrap_pending = false;
        self.col = 0;
    }

    pub(crate) fn tab(&mut self) {
        self.wrap_pending = false;
        let last = self.width - 1;
        let next = (u32::from(self.col) / u32::from(TAB_WIDTH) + 1) * u32::from(TAB_WIDTH);
        self.col = u16::try_from(next).map_or(last, |next| next.min(last));
    }

    pub(crate) fn backspace(&mut self) {
        self.wrap_pending = false;
        self.col = self.col.saturating_sub(1);
    }
}

fn clamp_axis(value: i32, extent: u16) -> u16 {
    let max = i32::from(extent) - 1;
    // In range after the clamp, so the conversion cannot fail.
    u16::try_from(value.clamp(0, max)).unwrap_or(0)
}
