//! Packed 4bpp sprite pixel decoding.
//!
//! Sprite ROMs on these boards store pixels linearly, row-major, two pixels
//! per byte with the high nibble holding the even pixel. A sprite of
//! `width * height` pixels therefore occupies `ceil(width * height / 2)`
//! bytes and rows are not padded to byte boundaries.

use super::palette::{IndexedPalette, TRANSPARENT_INDICES};
use crate::graphics::color::TRANSPARENT;
use crate::types::Image;
use crate::GfxError;

/// Trait for decoding packed pixel data into palette indices.
pub trait TileDecoder {
    /// Decode a single pixel.
    ///
    /// # Arguments
    /// * `data` - The raw packed data
    /// * `x` - X coordinate within the sprite
    /// * `y` - Y coordinate within the sprite
    ///
    /// # Returns
    /// The palette index for this pixel (0-15)
    fn decode_pixel(&self, data: &[u8], x: u32, y: u32) -> u8;

    /// Number of bytes needed to hold the whole sprite.
    fn data_len(&self) -> usize;
}

/// Linear 4bpp decoder for a sprite of fixed dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packed4BppDecoder {
    pub width: u32,
    pub height: u32,
}

impl Packed4BppDecoder {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check that `data` covers every pixel.
    pub fn check(&self, data: &[u8]) -> Result<(), GfxError> {
        let need = self.data_len();
        if data.len() < need {
            return Err(GfxError::InsufficientData {
                have: data.len(),
                need,
            });
        }
        Ok(())
    }

    /// Decode every pixel to its palette index, row-major.
    pub fn decode_indices(&self, data: &[u8]) -> Result<Vec<u8>, GfxError> {
        self.check(data)?;
        let count = self.width as usize * self.height as usize;
        Ok((0..count).map(|i| nibble_at(data, i)).collect())
    }
}

impl TileDecoder for Packed4BppDecoder {
    fn decode_pixel(&self, data: &[u8], x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let i = y as usize * self.width as usize + x as usize;
        if i / 2 >= data.len() {
            return 0;
        }
        nibble_at(data, i)
    }

    fn data_len(&self) -> usize {
        packed_len(self.width, self.height)
    }
}

#[inline]
fn nibble_at(data: &[u8], i: usize) -> u8 {
    let byte = data[i / 2];
    if i % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0F
    }
}

/// Bytes occupied by a packed 4bpp sprite.
#[inline]
pub fn packed_len(width: u32, height: u32) -> usize {
    (width as usize * height as usize + 1) / 2
}

/// A decoded sprite as palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteBitmap {
    pub width: u32,
    pub height: u32,
    pub indices: Vec<u8>,
}

impl SpriteBitmap {
    pub fn decode(data: &[u8], width: u32, height: u32) -> Result<Self, GfxError> {
        let indices = Packed4BppDecoder::new(width, height).decode_indices(data)?;
        Ok(Self {
            width,
            height,
            indices,
        })
    }

    /// Colour the sprite; indices 0 and 15 become fully transparent.
    pub fn to_image<P: IndexedPalette>(&self, palette: &P) -> Image {
        let mut img = Image::new(self.width, self.height);
        for (pixel, &index) in img.pixels.iter_mut().zip(&self.indices) {
            *pixel = if TRANSPARENT_INDICES.contains(&index) {
                TRANSPARENT
            } else {
                palette.get_color(index as usize)
            };
        }
        img
    }

    /// Indices for an indexed image where only index 0 is transparent:
    /// index 15 is folded into 0.
    pub fn single_transparent_indices(&self) -> Vec<u8> {
        self.indices
            .iter()
            .map(|&i| if i == 15 { 0 } else { i })
            .collect()
    }
}

/// Decode packed 4bpp data straight to an ARGB image.
pub fn decode_rgba<P: IndexedPalette>(
    data: &[u8],
    palette: &P,
    width: u32,
    height: u32,
) -> Result<Image, GfxError> {
    Ok(SpriteBitmap::decode(data, width, height)?.to_image(palette))
}

/// Exchange the high and low nibble of a byte.
#[inline]
pub fn swap_nibbles(byte: u8) -> u8 {
    ((byte & 0x0F) << 4) | ((byte & 0xF0) >> 4)
}

/// Swap the nibbles of every byte in place.
pub fn swap_nibbles_in_place(data: &mut [u8]) {
    for byte in data.iter_mut() {
        *byte = swap_nibbles(*byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppu::palette::Palette16;

    fn test_palette() -> Palette16 {
        let mut colors = [(0, 0, 0); 16];
        for (i, c) in colors.iter_mut().enumerate() {
            *c = (i as u8 * 10, i as u8 * 15, i as u8 * 16);
        }
        Palette16::from_colors(colors)
    }

    #[test]
    fn test_transparency_of_index_0_and_15() {
        let mut colors = [(0, 0, 0); 16];
        colors[1] = (10, 20, 30);
        let palette = Palette16::from_colors(colors);

        // High nibble first: 1 then 15, then two 0s
        let img = decode_rgba(&[0x1F, 0x00], &palette, 2, 2).unwrap();
        assert_eq!(img.pixels, vec![0xFF0A141E, 0, 0, 0]);

        let img = decode_rgba(&[0xF1, 0x00], &palette, 2, 2).unwrap();
        assert_eq!(img.pixels, vec![0, 0xFF0A141E, 0, 0]);
    }

    #[test]
    fn test_high_nibble_is_even_pixel() {
        let img = decode_rgba(&[0x12, 0x30], &test_palette(), 3, 1).unwrap();
        assert_eq!(img.pixels[0], 0xFF0A0F10);
        assert_eq!(img.pixels[1], 0xFF141E20);
        assert_eq!(img.pixels[2], 0xFF1E2D30);
    }

    #[test]
    fn test_odd_pixel_count_needs_rounded_up_bytes() {
        let decoder = Packed4BppDecoder::new(3, 3);
        assert_eq!(decoder.data_len(), 5);
        assert!(decoder.decode_indices(&[0u8; 5]).is_ok());
        assert!(matches!(
            decoder.decode_indices(&[0u8; 4]),
            Err(GfxError::InsufficientData { have: 4, need: 5 })
        ));
    }

    #[test]
    fn test_rows_are_not_byte_aligned() {
        // 3x2: second row starts on the low nibble of byte 1
        let decoder = Packed4BppDecoder::new(3, 2);
        let data = [0x12, 0x34, 0x56];
        assert_eq!(decoder.decode_pixel(&data, 0, 1), 4);
        assert_eq!(decoder.decode_pixel(&data, 2, 1), 6);
        assert_eq!(decoder.decode_pixel(&data, 3, 0), 0);
    }

    #[test]
    fn test_single_transparent_indices() {
        let sprite = SpriteBitmap::decode(&[0x0F, 0x1E], 4, 1).unwrap();
        assert_eq!(sprite.indices, vec![0, 15, 1, 14]);
        assert_eq!(sprite.single_transparent_indices(), vec![0, 0, 1, 14]);
    }

    #[test]
    fn test_swap_nibbles_is_involution() {
        assert_eq!(swap_nibbles(0x1F), 0xF1);
        for b in 0..=255u8 {
            assert_eq!(swap_nibbles(swap_nibbles(b)), b);
        }
        let mut data = vec![0x12, 0xAB];
        swap_nibbles_in_place(&mut data);
        assert_eq!(data, vec![0x21, 0xBA]);
    }
}
