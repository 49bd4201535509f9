#![forbid(unsafe_code)]

//! ANSI escape sequence generation helpers.
//!
//! Pure byte generation, no state tracking. Backends decide when to call
//! these.
//!
//! | Category | Sequence | Description |
//! |----------|----------|-------------|
//! | CSI | `ESC [ n ; ... m` | SGR (Select Graphic Rendition) |
//! | CSI | `ESC [ row ; col H` | CUP (Cursor Position, 1-indexed) |
//! | CSI | `ESC [ 2 J` | ED (Erase Display, all) |

use std::io::{self, Write};

use crate::palette::{AttrFlags, Attribute, ColorMapper};

/// SGR reset: `CSI 0 m`
pub const SGR_RESET: &[u8] = b"\x1b[0m";

/// Erase entire display: `CSI 2 J`
pub const ERASE_DISPLAY: &[u8] = b"\x1b[2J";

/// Cursor home: `CSI H`
pub const CURSOR_HOME: &[u8] = b"\x1b[H";

/// SGR bold, used for intense foregrounds.
pub const SGR_BOLD: u8 = 1;
/// Base of the 8 standard foreground colors (30-37).
pub const SGR_FG_BASE: u8 = 30;
/// Base of the 8 standard background colors (40-47).
pub const SGR_BG_BASE: u8 = 40;
/// Base of the 8 bright background colors (100-107).
pub const SGR_BG_BRIGHT_BASE: u8 = 100;

/// Write SGR reset sequence.
#[inline]
pub fn sgr_reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SGR_RESET)
}

/// Write erase-display followed by cursor home.
#[inline]
pub fn erase_display<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(ERASE_DISPLAY)?;
    w.write_all(CURSOR_HOME)
}

/// Write cursor home.
#[inline]
pub fn cursor_home<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(CURSOR_HOME)
}

/// CUP (Cursor Position): `CSI row+1 ; col+1 H`
///
/// Takes 0-indexed coordinates.
pub fn cup<W: Write>(w: &mut W, row: u16, col: u16) -> io::Result<()> {
    write!(
        w,
        "\x1b[{};{}H",
        row.saturating_add(1),
        col.saturating_add(1)
    )
}

/// SGR parameters for an attribute, starting from a reset.
///
/// The default slot keeps the terminal's own colors; only foreground
/// intensity applies to it, since there is no concrete background hue
/// to brighten.
#[must_use]
pub fn attribute_params(attribute: Attribute, palette: &ColorMapper) -> Vec<u8> {
    let mut params = vec![0];
    if let Some((fg, bg)) = palette.resolve(attribute.slot) {
        params.push(SGR_FG_BASE + fg.index());
        let bg_base = if attribute.flags.contains(AttrFlags::BG_INTENSE) {
            SGR_BG_BRIGHT_BASE
        } else {
            SGR_BG_BASE
        };
        params.push(bg_base + bg.index());
    }
    if attribute.flags.contains(AttrFlags::FG_INTENSE) {
        params.push(SGR_BOLD);
    }
    params
}

/// Write one SGR sequence selecting `attribute` from a clean state.
pub fn sgr_attribute<W: Write>(
    w: &mut W,
    attribute: Attribute,
    palette: &ColorMapper,
) -> io::Result<()> {
    let params = attribute_params(attribute, palette);
    if params == [0] {
        return sgr_reset(w);
    }
    w.write_all(b"\x1b[")?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            w.write_all(b";")?;
        }
        write!(w, "{param}")?;
    }
    w.write_all(b"m")
}
