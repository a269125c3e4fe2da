//! Core primitives for pulling sprite and palette assets out of 16-bit era
//! arcade/console ROM dumps.
//!
//! The crate is split the same way the hardware is:
//!
//! - [`ppu`]: palette RAM decoding and 4bpp tile decoding
//! - [`sprite`]: sprite descriptor tables, CSV indexes, the shared decode
//!   pipeline and the atlas packer
//! - [`graphics`]: ARGB colour helpers and simple raster drawing
//! - [`export`]: PNG and manifest writers
//! - [`logging`]: categorised diagnostics

pub mod export;
pub mod graphics;
pub mod layout;
pub mod logging;
pub mod ppu;
pub mod sprite;

pub use layout::RomLayout;

pub mod types {
    /// An ARGB8888 (0xAARRGGBB) pixel buffer.
    ///
    /// A zeroed pixel is fully transparent, so a fresh image is a clean
    /// canvas for compositing.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Image {
        pub width: u32,
        pub height: u32,
        pub pixels: Vec<u32>,
    }

    impl Image {
        pub fn new(width: u32, height: u32) -> Self {
            Self::filled(width, height, 0)
        }

        pub fn filled(width: u32, height: u32, color: u32) -> Self {
            Self {
                width,
                height,
                pixels: vec![color; (width as usize) * (height as usize)],
            }
        }

        /// Read a pixel; coordinates outside the image yield transparent.
        pub fn get(&self, x: i64, y: i64) -> u32 {
            match self.index_of(x, y) {
                Some(i) => self.pixels[i],
                None => 0,
            }
        }

        /// Write a pixel; coordinates outside the image are clipped.
        pub fn put(&mut self, x: i64, y: i64, color: u32) {
            if let Some(i) = self.index_of(x, y) {
                self.pixels[i] = color;
            }
        }

        fn index_of(&self, x: i64, y: i64) -> Option<usize> {
            if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
                return None;
            }
            Some(y as usize * self.width as usize + x as usize)
        }

        /// Flatten into RGBA byte order for PNG encoding.
        pub fn to_rgba_bytes(&self) -> Vec<u8> {
            let mut out = Vec::with_capacity(self.pixels.len() * 4);
            for &p in &self.pixels {
                out.push((p >> 16) as u8);
                out.push((p >> 8) as u8);
                out.push(p as u8);
                out.push((p >> 24) as u8);
            }
            out
        }

        /// Flatten into RGB byte order, dropping alpha.
        pub fn to_rgb_bytes(&self) -> Vec<u8> {
            let mut out = Vec::with_capacity(self.pixels.len() * 3);
            for &p in &self.pixels {
                out.push((p >> 16) as u8);
                out.push((p >> 8) as u8);
                out.push(p as u8);
            }
            out
        }
    }
}

/// Errors produced while reading tables, palettes and sprite data, or while
/// writing results.
#[derive(thiserror::Error, Debug)]
pub enum GfxError {
    #[error("entry offset 0x{offset:06X} out of bounds ({len} byte buffer)")]
    OutOfBounds { offset: usize, len: usize },
    #[error("sprite data too short: have {have} bytes, need {need}")]
    InsufficientData { have: usize, need: usize },
    #[error("malformed row {line}: {reason}")]
    MalformedRow { line: u64, reason: String },
    #[error("palette {palette:02X} out of range ({available} palettes available)")]
    PaletteOutOfRange { palette: u32, available: usize },
    #[error("palette data size {len} is not a multiple of {unit} bytes")]
    PaletteSize { len: usize, unit: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Png(#[from] png::EncodingError),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("invalid layout description: {0}")]
    Layout(#[from] serde_json::Error),
}
