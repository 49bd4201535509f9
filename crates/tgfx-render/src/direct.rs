#![forbid(unsafe_code)]

//! Direct-write backend: drawing is visible as soon as it happens.
//!
//! Each operation is translated to ANSI sequences and written to the sink
//! straight away, then the sink is flushed. The backend only remembers
//! where the cursor is; the terminal itself holds the picture, so the
//! tracked cursor follows the terminal's rules: a character in the last
//! column leaves the cursor there until the next character wraps it.

use std::io::{self, Write};

use tgfx_core::config::DEFAULT_COLOR_SLOTS;

use crate::ansi;
use crate::backend::{Cursor, ScreenBackend, TextByte};
use crate::palette::{Attribute, ColorMapper};

/// Backend that writes every operation through to `W`.
#[derive(Debug)]
pub struct DirectBackend<W: Write> {
    writer: W,
    width: u16,
    height: u16,
    cursor: Cursor,
    capacity: usize,
}

impl<W: Write> DirectBackend<W> {
    /// Backend for a `width` x `height` terminal.
    pub fn new(writer: W, width: u16, height: u16) -> Self {
        Self {
            writer,
            width: width.max(1),
            height: height.max(1),
            cursor: Cursor::new(width, height),
            capacity: DEFAULT_COLOR_SLOTS,
        }
    }

    /// Override the number of attribute slots reported to the mapper.
    #[must_use]
    pub fn with_attribute_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// The sink.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consume the backend, returning the sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ScreenBackend for DirectBackend<W> {
    fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn attribute_capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) -> io::Result<()> {
        ansi::sgr_reset(&mut self.writer)?;
        ansi::erase_display(&mut self.writer)?;
        self.cursor.home();
        self.writer.flush()
    }

    fn move_cursor(&mut self, row: i32, col: i32) -> io::Result<()> {
        self.cursor.set_clamped(row, col);
        ansi::cup(&mut self.writer, self.cursor.row, self.cursor.col)?;
        self.writer.flush()
    }

    fn cursor(&self) -> (u16, u16) {
        self.cursor.position()
    }

    fn write_text(
        &mut self,
        text: &str,
        attribute: Attribute,
        palette: &ColorMapper,
    ) -> io::Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        ansi::sgr_attribute(&mut self.writer, attribute, palette)?;
        for byte in text.bytes() {
            match TextByte::classify(byte) {
                TextByte::Newline => {
                    self.writer.write_all(b"\r\n")?;
                    self.cursor.newline();
                }
                TextByte::CarriageReturn => {
                    self.writer.write_all(b"\r")?;
                    self.cursor.carriage_return();
                }
                // Tab stops and backspace-after-wrap vary between
                // terminals; position explicitly instead.
                TextByte::Tab => {
                    self.cursor.tab();
                    ansi::cup(&mut self.writer, self.cursor.row, self.cursor.col)?;
                }
                TextByte::Backspace => {
                    self.cursor.backspace();
                    ansi::cup(&mut self.writer, self.cursor.row, self.cursor.col)?;
                }
                TextByte::Glyph(ch) => {
                    self.cursor.resolve_pending_wrap();
                    self.writer.write_all(&[ch])?;
                    self.cursor.advance_held();
                }
            }
        }
        ansi::sgr_reset(&mut self.writer)?;
        self.writer.flush()
    }

    fn flush(&mut self, _palette: &ColorMapper) -> io::Result<()> {
        self.writer.flush()
    }
}
