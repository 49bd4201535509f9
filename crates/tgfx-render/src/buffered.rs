#![forbid(unsafe_code)]

//! Buffered backend: drawing goes to an off-screen grid.
//!
//! Nothing reaches the terminal until [`ScreenBackend::flush`], which
//! repaints the whole grid in one pass and then places the cursor.
//!
//! # Flush Output
//!
//! 1. Cursor home
//! 2. Each row from column 0, with an SGR sequence only where the
//!    attribute differs from the previous cell
//! 3. SGR reset
//! 4. CUP to the tracked cursor
//!
//! Cells only ever hold printable ASCII, and flush re-checks it, so a
//! repaint never emits anything but its own sequences. Output is staged
//! in a [`BufWriter`] and reaches the sink in one write.

use std::io::{self, BufWriter, Write};

use tgfx_core::config::DEFAULT_COLOR_SLOTS;

use crate::ansi;
use crate::backend::{Advance, Cursor, ScreenBackend, TextByte, glyph};
use crate::buffer::{Cell, ScreenBuffer};
use crate::palette::{Attribute, ColorMapper};

/// Size of the internal write buffer (64KB).
const BUFFER_CAPACITY: usize = 64 * 1024;

/// Backend that stages drawing in a [`ScreenBuffer`].
#[derive(Debug)]
pub struct BufferedBackend<W: Write> {
    writer: BufWriter<W>,
    buffer: ScreenBuffer,
    cursor: Cursor,
    capacity: usize,
}

impl<W: Write> BufferedBackend<W> {
    /// Backend with a blank `width` x `height` grid.
    pub fn new(writer: W, width: u16, height: u16) -> Self {
        let buffer = ScreenBuffer::new(width, height);
        let cursor = Cursor::new(buffer.width(), buffer.height());
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            buffer,
            cursor,
            capacity: DEFAULT_COLOR_SLOTS,
        }
    }

    /// Override the number of attribute slots reported to the mapper.
    #[must_use]
    pub fn with_attribute_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// The off-screen grid.
    pub fn buffer(&self) -> &ScreenBuffer {
        &self.buffer
    }

    /// The sink. Bytes still staged in the write buffer are not visible
    /// here until [`ScreenBackend::flush`].
    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    /// Consume the backend, returning the sink.
    ///
    /// # Errors
    ///
    /// Fails if staged output cannot be written.
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }

    fn put(&mut self, byte: u8, attribute: Attribute) {
        let scrolled = match TextByte::classify(byte) {
            TextByte::Newline => self.cursor.newline() == Advance::Scrolled,
            TextByte::CarriageReturn => {
                self.cursor.carriage_return();
                false
            }
            TextByte::Tab => {
                self.cursor.tab();
                false
            }
            TextByte::Backspace => {
                self.cursor.backspace();
                false
            }
            TextByte::Glyph(ch) => {
                self.buffer
                    .set(self.cursor.row, self.cursor.col, Cell::new(ch, attribute));
                self.cursor.advance() == Advance::Scrolled
            }
        };
        if scrolled {
            self.buffer.scroll_up(attribute);
        }
    }

    fn paint(&mut self, palette: &ColorMapper) -> io::Result<()> {
        let w = &mut self.writer;
        ansi::cursor_home(w)?;
        ansi::sgr_reset(w)?;
        let mut current = Attribute::DEFAULT;
        for row in 0..self.buffer.height() {
            if row > 0 {
                ansi::cup(w, row, 0)?;
            }
            for cell in self.buffer.row(row) {
                if cell.attr != current {
                    ansi::sgr_attribute(w, cell.attr, palette)?;
                    current = cell.attr;
                }
                w.write_all(&[glyph(cell.ch)])?;
            }
        }
        ansi::sgr_reset(w)?;
        ansi::cup(w, self.cursor.row, self.cursor.col)
    }
}

impl<W: Write> ScreenBackend for BufferedBackend<W> {
    fn size(&self) -> (u16, u16) {
        (self.buffer.width(), self.buffer.height())
    }

    fn attribute_capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) -> io::Result<()> {
        self.buffer.clear();
        self.cursor.home();
        Ok(())
    }

    fn move_cursor(&mut self, row: i32, col: i32) -> io::Result<()> {
        self.cursor.set_clamped(row, col);
        Ok(())
    }

    fn cursor(&self) -> (u16, u16) {
        self.cursor.position()
    }

    fn write_text(
        &mut self,
        text: &str,
        attribute: Attribute,
        _palette: &ColorMapper,
    ) -> io::Result<()> {
        for byte in text.bytes() {
            self.put(byte, attribute);
        }
        Ok(())
    }

    fn flush(&mut self, palette: &ColorMapper) -> io::Result<()> {
        self.paint(palette)?;
        self.writer.flush()?;
        tracing::trace!(
            width = self.buffer.width(),
            height = self.buffer.height(),
            "screen buffer flushed"
        );
        Ok(())
    }
}
