//! Video hardware building blocks: palette RAM formats and the packed 4bpp
//! sprite pixel format.
//!
//! These mirror what the board's sprite hardware does when it fetches
//! pixels and looks them up in palette RAM, minus any timing.

pub mod palette;
pub mod palette_sheet;
pub mod tile;

pub use palette::{IndexedPalette, Palette16, PaletteBank};
pub use tile::{Packed4BppDecoder, SpriteBitmap, TileDecoder};
