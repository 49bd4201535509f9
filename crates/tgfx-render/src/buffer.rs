#![forbid(unsafe_code)]

//! Off-screen character grid.
//!
//! Cells are stored in row-major order: `index = row * width + col`.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height never change after creation

use crate::palette::Attribute;

/// One grid position: a byte and the attribute it is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: u8,
    pub attr: Attribute,
}

impl Cell {
    /// Space in the default attribute.
    pub const BLANK: Self = Self::blank(Attribute::DEFAULT);

    #[must_use]
    pub const fn new(ch: u8, attr: Attribute) -> Self {
        Self { ch, attr }
    }

    /// Space in the given attribute.
    #[must_use]
    pub const fn blank(attr: Attribute) -> Self {
        Self { ch: b' ', attr }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

/// A fixed-size 2D grid of [`Cell`]s.
///
/// ```
/// use tgfx_render::buffer::{Cell, ScreenBuffer};
/// use tgfx_render::palette::Attribute;
///
/// let mut buffer = ScreenBuffer::new(5, 3);
/// buffer.set(0, 0, Cell::new(b'H', Attribute::DEFAULT));
/// assert_eq!(buffer.row_text(0), "H    ");
/// ```
#[derive(Debug, Clone)]
pub struct ScreenBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl ScreenBuffer {
    /// Blank grid. Zero dimensions are raised to 1 so every position the
    /// cursor can reach exists.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, row: u16, col: u16) -> Option<usize> {
        (row < self.height && col < self.width)
            .then(|| usize::from(row) * usize::from(self.width) + usize::from(col))
    }

    #[must_use]
    pub fn get(&self, row: u16, col: u16) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    /// Set a cell; out-of-bounds writes are ignored.
    pub fn set(&mut self, row: u16, col: u16, cell: Cell) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = cell;
        }
    }

    /// Cells of one row; empty for rows outside the grid.
    #[must_use]
    pub fn row(&self, row: u16) -> &[Cell] {
        if row >= self.height {
            return &[];
        }
        let start = usize::from(row) * usize::from(self.width);
        &self.cells[start..start + usize::from(self.width)]
    }

    /// Characters of one row as a string.
    #[must_use]
    pub fn row_text(&self, row: u16) -> String {
        self.row(row).iter().map(|cell| char::from(cell.ch)).collect()
    }

    /// Reset every cell to [`Cell::BLANK`].
    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Shift every row up by one, dropping the top row; the new bottom
    /// row is blank in `fill`.
    pub fn scroll_up(&mut self, fill: Attribute) {
        let width = usize::from(self.width);
        self.cells.copy_within(width.., 0);
        let len = self.cells.len();
        self.cells[len - width..].fill(Cell::blank(fill));
    }
}
