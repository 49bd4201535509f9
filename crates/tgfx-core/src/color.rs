#![forbid(unsafe_code)]

//! The eight-hue color model.
//!
//! A [`Color`] is one of eight [`Hue`]s plus an orthogonal `intense` bit.
//! Foreground and background are chosen independently. Intensity is a
//! modifier, never a ninth hue.

/// Legacy bit that marks a color code as intense (`hue | INTENSE`).
pub const INTENSE: i32 = 8;

/// One of the eight base hues (0-7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Hue {
    /// Black (0).
    Black = 0,
    /// Red (1).
    Red = 1,
    /// Green (2).
    Green = 2,
    /// Yellow (3).
    Yellow = 3,
    /// Blue (4).
    Blue = 4,
    /// Magenta (5).
    Magenta = 5,
    /// Cyan (6).
    Cyan = 6,
    /// Gray, the terminal's default foreground (7).
    Gray = 7,
}

impl Hue {
    /// All hues in index order.
    pub const ALL: [Hue; 8] = [
        Hue::Black,
        Hue::Red,
        Hue::Green,
        Hue::Yellow,
        Hue::Blue,
        Hue::Magenta,
        Hue::Cyan,
        Hue::Gray,
    ];

    /// Raw hue index (0-7).
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Hue from the low three bits of `value`.
    #[must_use]
    pub const fn from_bits(value: u8) -> Self {
        match value & 7 {
            0 => Self::Black,
            1 => Self::Red,
            2 => Self::Green,
            3 => Self::Yellow,
            4 => Self::Blue,
            5 => Self::Magenta,
            6 => Self::Cyan,
            _ => Self::Gray,
        }
    }
}

/// A hue with an optional intensity modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Base hue.
    pub hue: Hue,
    /// Whether the intense (bright/bold) variant is requested.
    pub intense: bool,
}

impl Color {
    pub const BLACK: Color = Color::new(Hue::Black);
    pub const RED: Color = Color::new(Hue::Red);
    pub const GREEN: Color = Color::new(Hue::Green);
    pub const YELLOW: Color = Color::new(Hue::Yellow);
    pub const BLUE: Color = Color::new(Hue::Blue);
    pub const MAGENTA: Color = Color::new(Hue::Magenta);
    pub const CYAN: Color = Color::new(Hue::Cyan);
    pub const GRAY: Color = Color::new(Hue::Gray);

    /// A non-intense color of the given hue.
    #[must_use]
    pub const fn new(hue: Hue) -> Self {
        Self {
            hue,
            intense: false,
        }
    }

    /// The same hue with the intense bit set.
    #[must_use]
    pub const fn intense(self) -> Self {
        Self {
            hue: self.hue,
            intense: true,
        }
    }

    /// Decode a legacy integer color code (`hue | INTENSE`).
    ///
    /// Bits above `INTENSE` are ignored.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        Self {
            hue: Hue::from_bits((code & 7) as u8),
            intense: code & INTENSE != 0,
        }
    }

    /// Encode as a legacy integer color code.
    #[must_use]
    pub const fn code(self) -> i32 {
        let base = self.hue.index() as i32;
        if self.intense { base | INTENSE } else { base }
    }
}

impl From<Hue> for Color {
    fn from(hue: Hue) -> Self {
        Self::new(hue)
    }
}
