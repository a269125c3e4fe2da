//! Palette RAM decoding and flat RGB palette banks.
//!
//! Sprite palettes on these boards are 16 colours wide. Dumps of the palette
//! RAM hold one 16-bit word per colour; after decoding, a palette file is a
//! flat run of `(r, g, b)` byte triples, 16 triples per palette.
//!
//! # Sega System 16 word layout
//!
//! ```text
//! bit  15 14 13 12 | 11 10 9 8 | 7 6 5 4 | 3 2 1 0
//!       -  b0 g0 r0 | b4 .. b1  | g4 .. g1 | r4 .. r1
//! ```
//!
//! Each 5-bit channel is widened to 8 bits by replicating its top bits.

use crate::graphics::ColorOps;
use crate::logging::{log, LogCategory, LogLevel};
use crate::GfxError;

/// Colours per sprite palette.
pub const COLORS_PER_PALETTE: usize = 16;

/// Bytes per palette in a flat RGB palette file.
pub const PALETTE_BYTES: usize = COLORS_PER_PALETTE * 3;

/// Palette indices that render as transparent in sprites.
pub const TRANSPARENT_INDICES: [u8; 2] = [0, 15];

/// Indexed colour lookup.
pub trait IndexedPalette {
    /// Get the colour for a palette index as ARGB (0xAARRGGBB).
    fn get_color(&self, index: usize) -> u32;

    /// Get the number of colors in this palette.
    fn len(&self) -> usize;

    /// Check if the palette is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One 16-colour palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette16 {
    colors: [(u8, u8, u8); COLORS_PER_PALETTE],
}

impl Palette16 {
    pub fn from_rgb_bytes(bytes: &[u8; PALETTE_BYTES]) -> Self {
        let mut colors = [(0, 0, 0); COLORS_PER_PALETTE];
        for (color, rgb) in colors.iter_mut().zip(bytes.chunks_exact(3)) {
            *color = (rgb[0], rgb[1], rgb[2]);
        }
        Self { colors }
    }

    pub fn from_colors(colors: [(u8, u8, u8); COLORS_PER_PALETTE]) -> Self {
        Self { colors }
    }

    pub fn rgb(&self, index: usize) -> (u8, u8, u8) {
        self.colors[index % COLORS_PER_PALETTE]
    }

    /// The palette as a PNG `PLTE` payload.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|&(r, g, b)| [r, g, b]).collect()
    }
}

impl IndexedPalette for Palette16 {
    fn get_color(&self, index: usize) -> u32 {
        let (r, g, b) = self.rgb(index);
        ColorOps::from_rgb(r, g, b)
    }

    fn len(&self) -> usize {
        COLORS_PER_PALETTE
    }
}

/// A flat RGB palette file viewed as numbered 16-colour palettes.
#[derive(Debug, Clone, Copy)]
pub struct PaletteBank<'a> {
    data: &'a [u8],
}

impl<'a> PaletteBank<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Number of complete palettes in the bank.
    pub fn count(&self) -> usize {
        self.data.len() / PALETTE_BYTES
    }

    /// The palette starting at byte `palette_num * 48`.
    pub fn get(&self, palette_num: u32) -> Result<Palette16, GfxError> {
        let out_of_range = || GfxError::PaletteOutOfRange {
            palette: palette_num,
            available: self.count(),
        };
        let start = (palette_num as usize)
            .checked_mul(PALETTE_BYTES)
            .ok_or_else(out_of_range)?;
        let bytes = self
            .data
            .get(start..start + PALETTE_BYTES)
            .ok_or_else(out_of_range)?;
        let bytes: &[u8; PALETTE_BYTES] = bytes.try_into().map_err(|_| out_of_range())?;
        Ok(Palette16::from_rgb_bytes(bytes))
    }

    /// Every palette in the bank; the file must hold whole palettes only.
    pub fn palettes(&self) -> Result<Vec<Palette16>, GfxError> {
        if self.data.len() % PALETTE_BYTES != 0 {
            return Err(GfxError::PaletteSize {
                len: self.data.len(),
                unit: PALETTE_BYTES,
            });
        }
        (0..self.count() as u32).map(|n| self.get(n)).collect()
    }
}

/// Widen a 5-bit channel to 8 bits: 0 maps to 0 and 31 to 255.
#[inline]
pub fn pal5bit(value: u8) -> u8 {
    let v = value & 0x1F;
    (v << 3) | (v >> 2)
}

/// Split a System 16 palette word into its 5-bit channels.
#[inline]
pub fn system16_channels(word: u16) -> (u8, u8, u8) {
    let r = ((word >> 12) & 0x01) | ((word << 1) & 0x1E);
    let g = ((word >> 13) & 0x01) | ((word >> 3) & 0x1E);
    let b = ((word >> 14) & 0x01) | ((word >> 7) & 0x1E);
    (r as u8, g as u8, b as u8)
}

/// Decode a System 16 palette word to 8-bit RGB.
#[inline]
pub fn decode_system16_word(word: u16) -> (u8, u8, u8) {
    let (r, g, b) = system16_channels(word);
    (pal5bit(r), pal5bit(g), pal5bit(b))
}

/// Build the System 16 word holding the given 5-bit channels.
pub fn encode_system16_word(r: u8, g: u8, b: u8) -> u16 {
    let (r, g, b) = ((r & 0x1F) as u16, (g & 0x1F) as u16, (b & 0x1F) as u16);
    ((b & 1) << 14)
        | ((g & 1) << 13)
        | ((r & 1) << 12)
        | ((b >> 1) << 8)
        | ((g >> 1) << 4)
        | (r >> 1)
}

/// Convert a big-endian palette RAM dump into a flat RGB palette file.
///
/// A trailing odd byte is ignored.
pub fn decode_palette_ram(ram: &[u8]) -> Vec<u8> {
    if ram.len() % 2 != 0 {
        log(LogCategory::Palette, LogLevel::Warn, || {
            format!("palette dump has odd length {}, last byte ignored", ram.len())
        });
    }
    ram.chunks_exact(2)
        .flat_map(|pair| {
            let (r, g, b) = decode_system16_word(u16::from_be_bytes([pair[0], pair[1]]));
            [r, g, b]
        })
        .collect()
}
