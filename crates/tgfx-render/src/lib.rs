#![forbid(unsafe_code)]

//! Output side: color mapping, the cell grid, ANSI emission, and the two
//! screen backends.

pub mod ansi;
pub mod backend;
pub mod buffer;
pub mod buffered;
pub mod direct;
pub mod palette;

pub use backend::ScreenBackend;
pub use buffered::BufferedBackend;
pub use direct::DirectBackend;
pub use palette::{AttrFlags, Attribute, AttributeSlot, ColorMapper};
