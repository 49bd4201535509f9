#![forbid(unsafe_code)]

//! Color mapper: (foreground, background) hue pairs to attribute slots.
//!
//! Terminals of the 8-color era can only show a bounded number of
//! color combinations at once. The [`ColorMapper`] hands out one
//! [`AttributeSlot`] per distinct pair, reusing the slot on repeat
//! requests, and falls back to the default slot once the capacity is
//! spent.
//!
//! # Invariants
//!
//! 1. Slot 0 is the default attribute; gray on black always maps to it
//!    and never consumes capacity.
//! 2. At most one slot per distinct pair.
//! 3. `allocated() <= capacity()`.
//! 4. A pair that once fell back to slot 0 keeps mapping to slot 0.

use tgfx_core::color::{Color, Hue};

/// Foreground hue of the reserved default pair.
pub const DEFAULT_FG: Hue = Hue::Gray;
/// Background hue of the reserved default pair.
pub const DEFAULT_BG: Hue = Hue::Black;

const PAIR_COUNT: usize = Hue::ALL.len() * Hue::ALL.len();

/// Backend-neutral token for a rendered (fg, bg) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct AttributeSlot(u16);

impl AttributeSlot {
    /// Terminal default colors.
    pub const DEFAULT: Self = Self(0);

    /// Slot number; 0 is the default.
    #[must_use]
    pub const fn index(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn is_default(self) -> bool {
        self.0 == 0
    }
}

bitflags::bitflags! {
    /// Intensity bits carried alongside a slot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttrFlags: u8 {
        /// Bright foreground.
        const FG_INTENSE = 0b0000_0001;
        /// Bright background.
        const BG_INTENSE = 0b0000_0010;
    }
}

/// What a cell stores and what a write applies: slot plus intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attribute {
    pub slot: AttributeSlot,
    pub flags: AttrFlags,
}

impl Attribute {
    pub const DEFAULT: Self = Self {
        slot: AttributeSlot::DEFAULT,
        flags: AttrFlags::empty(),
    };

    #[must_use]
    pub const fn new(slot: AttributeSlot, flags: AttrFlags) -> Self {
        Self { slot, flags }
    }
}

/// Hue pair to slot cache with a fixed capacity.
///
/// ```
/// use tgfx_core::color::Hue;
/// use tgfx_render::palette::{AttributeSlot, ColorMapper};
///
/// let mut mapper = ColorMapper::new(1);
/// let red_on_blue = mapper.allocate_or_reuse(Hue::Red, Hue::Blue);
/// assert_eq!(red_on_blue.index(), 1);
/// assert_eq!(mapper.allocate_or_reuse(Hue::Red, Hue::Blue), red_on_blue);
/// // Capacity spent: everything else shares the default.
/// assert_eq!(mapper.allocate_or_reuse(Hue::Green, Hue::Black), AttributeSlot::DEFAULT);
/// ```
#[derive(Debug, Clone)]
pub struct ColorMapper {
    capacity: usize,
    /// Cached slot per pair, indexed by `fg * 8 + bg`.
    cache: [Option<AttributeSlot>; PAIR_COUNT],
    /// Pair for slot `n` at index `n - 1`.
    pairs: Vec<(Hue, Hue)>,
    fallbacks: usize,
}

impl ColorMapper {
    /// Mapper that allocates at most `capacity` non-default slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let mut cache = [None; PAIR_COUNT];
        cache[pair_index(DEFAULT_FG, DEFAULT_BG)] = Some(AttributeSlot::DEFAULT);
        Self {
            capacity: capacity.min(PAIR_COUNT - 1),
            cache,
            pairs: Vec::new(),
            fallbacks: 0,
        }
    }

    /// Non-default slots this mapper may hand out.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Non-default slots handed out so far.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.pairs.len()
    }

    /// Distinct pairs that were refused a slot and render as the default.
    #[must_use]
    pub fn fallbacks(&self) -> usize {
        self.fallbacks
    }

    /// Slot for the pair, allocating one on first sight while capacity
    /// remains.
    pub fn allocate_or_reuse(&mut self, fg: Hue, bg: Hue) -> AttributeSlot {
        let index = pair_index(fg, bg);
        if let Some(slot) = self.cache[index] {
            return slot;
        }

        let slot = if self.pairs.len() < self.capacity {
            self.pairs.push((fg, bg));
            let slot = AttributeSlot(self.pairs.len() as u16);
            tracing::trace!(?fg, ?bg, slot = slot.index(), "attribute slot allocated");
            slot
        } else {
            if self.fallbacks == 0 {
                tracing::debug!(
                    capacity = self.capacity,
                    "attribute slots exhausted, falling back to default"
                );
            }
            self.fallbacks += 1;
            AttributeSlot::DEFAULT
        };
        self.cache[index] = Some(slot);
        slot
    }

    /// The pair a slot stands for; `None` for the default slot and for
    /// slots this mapper never handed out.
    #[must_use]
    pub fn resolve(&self, slot: AttributeSlot) -> Option<(Hue, Hue)> {
        let n = usize::from(slot.index());
        if n == 0 {
            return None;
        }
        self.pairs.get(n - 1).copied()
    }

    /// Slot and intensity flags for a full color pair.
    pub fn attribute(&mut self, fg: Color, bg: Color) -> Attribute {
        let slot = self.allocate_or_reuse(fg.hue, bg.hue);
        let mut flags = AttrFlags::empty();
        flags.set(AttrFlags::FG_INTENSE, fg.intense);
        flags.set(AttrFlags::BG_INTENSE, bg.intense);
        Attribute::new(slot, flags)
    }
}

impl Default for ColorMapper {
    fn default() -> Self {
        Self::new(PAIR_COUNT - 1)
    }
}

fn pair_index(fg: Hue, bg: Hue) -> usize {
    usize::from(fg.index()) * Hue::ALL.len() + usize::from(bg.index())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pair_is_slot_zero_and_free() {
        let mut mapper = ColorMapper::new(2);
        assert_eq!(
            mapper.allocate_or_reuse(Hue::Gray, Hue::Black),
            AttributeSlot::DEFAULT
        );
        assert_eq!(mapper.allocated(), 0);
        assert_eq!(mapper.fallbacks(), 0);
    }

    #[test]
    fn slots_are_allocated_in_order_and_cached() {
        let mut mapper = ColorMapper::new(3);
        let a = mapper.allocate_or_reuse(Hue::Red, Hue::Black);
        let b = mapper.allocate_or_reuse(Hue::Green, Hue::Blue);
        assert_eq!((a.index(), b.index()), (1, 2));
        assert_eq!(mapper.allocate_or_reuse(Hue::Red, Hue::Black), a);
        assert_eq!(mapper.allocate_or_reuse(Hue::Green, Hue::Blue), b);
        assert_eq!(mapper.allocated(), 2);
    }

    #[test]
    fn pair_order_matters() {
        let mut mapper = ColorMapper::new(4);
        let a = mapper.allocate_or_reuse(Hue::Red, Hue::Blue);
        let b = mapper.allocate_or_reuse(Hue::Blue, Hue::Red);
        assert_ne!(a, b);
    }

    #[test]
    fn capacity_plus_one_falls_back_to_default() {
        let mut mapper = ColorMapper::new(2);
        mapper.allocate_or_reuse(Hue::Red, Hue::Black);
        mapper.allocate_or_reuse(Hue::Green, Hue::Black);
        let third = mapper.allocate_or_reuse(Hue::Blue, Hue::Black);
        assert_eq!(third, AttributeSlot::DEFAULT);
        assert_eq!(mapper.allocated(), 2);
        assert_eq!(mapper.fallbacks(), 1);
        // Deterministic on repeat, and no double counting.
        assert_eq!(
            mapper.allocate_or_reuse(Hue::Blue, Hue::Black),
            AttributeSlot::DEFAULT
        );
        assert_eq!(mapper.fallbacks(), 1);
    }

    #[test]
    fn zero_capacity_renders_everything_default() {
        let mut mapper = ColorMapper::new(0);
        for fg in Hue::ALL {
            for bg in Hue::ALL {
                assert!(mapper.allocate_or_reuse(fg, bg).is_default());
            }
        }
        assert_eq!(mapper.allocated(), 0);
    }

    #[test]
    fn default_capacity_covers_every_pair() {
        let mut mapper = ColorMapper::default();
        assert_eq!(mapper.capacity(), 63);
        for fg in Hue::ALL {
            for bg in Hue::ALL {
                let slot = mapper.allocate_or_reuse(fg, bg);
                let is_default_pair = fg == DEFAULT_FG && bg == DEFAULT_BG;
                assert_eq!(slot.is_default(), is_default_pair);
            }
        }
        assert_eq!(mapper.allocated(), 63);
        assert_eq!(mapper.fallbacks(), 0);
    }

    #[test]
    fn capacity_is_capped_at_distinct_pairs() {
        assert_eq!(ColorMapper::new(1000).capacity(), 63);
    }

    #[test]
    fn resolve_returns_allocated_pair() {
        let mut mapper = ColorMapper::new(4);
        let slot = mapper.allocate_or_reuse(Hue::Cyan, Hue::Magenta);
        assert_eq!(mapper.resolve(slot), Some((Hue::Cyan, Hue::Magenta)));
        assert_eq!(mapper.resolve(AttributeSlot::DEFAULT), None);
        assert_eq!(mapper.resolve(AttributeSlot(9)), None);
    }

    #[test]
    fn attribute_carries_intensity() {
        let mut mapper = ColorMapper::new(4);
        let attr = mapper.attribute(Color::YELLOW.intense(), Color::BLUE);
        assert_eq!(attr.slot.index(), 1);
        assert_eq!(attr.flags, AttrFlags::FG_INTENSE);

        let attr = mapper.attribute(Color::YELLOW, Color::BLUE.intense());
        assert_eq!(attr.slot.index(), 1);
        assert_eq!(attr.flags, AttrFlags::BG_INTENSE);

        assert_eq!(mapper.attribute(Color::GRAY, Color::BLACK), Attribute::DEFAULT);
    }
}
