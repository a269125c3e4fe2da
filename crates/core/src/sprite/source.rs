//! The decode pipeline shared by every front end: descriptor, palette, packed
//! pixels, decoded sprite.

use super::index::SpriteRequest;
use super::report::{Outcome, RunReport};
use super::table::{SpriteTable, SpriteTableEntry};
use crate::layout::RomLayout;
use crate::logging::{log, LogCategory, LogLevel};
use crate::ppu::{PaletteBank, Palette16, SpriteBitmap};
use crate::types::Image;
use crate::GfxError;

/// A sprite decoded with one particular palette.
#[derive(Debug, Clone)]
pub struct DecodedSprite {
    pub entry: SpriteTableEntry,
    pub palette_num: u32,
    pub palette: Palette16,
    pub bitmap: SpriteBitmap,
}

impl DecodedSprite {
    pub fn entry_offset(&self) -> usize {
        self.entry.entry_offset
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height
    }

    /// RGBA rendering with indices 0 and 15 transparent.
    pub fn to_image(&self) -> Image {
        self.bitmap.to_image(&self.palette)
    }
}

/// The three ROM images a sprite is assembled from.
pub struct SpriteSource<'a> {
    table: SpriteTable<'a>,
    sprites: &'a [u8],
    palettes: PaletteBank<'a>,
}

impl<'a> SpriteSource<'a> {
    pub fn new(code: &'a [u8], sprites: &'a [u8], palettes: &'a [u8], layout: RomLayout) -> Self {
        Self {
            table: SpriteTable::new(code, layout),
            sprites,
            palettes: PaletteBank::new(palettes),
        }
    }

    pub fn table(&self) -> &SpriteTable<'a> {
        &self.table
    }

    pub fn palettes(&self) -> &PaletteBank<'a> {
        &self.palettes
    }

    /// Packed pixel bytes for `entry`, possibly fewer than it needs.
    pub fn packed_data(&self, entry: &SpriteTableEntry) -> &'a [u8] {
        let sprites = self.sprites;
        let start = entry.data_offset().min(sprites.len());
        let need = crate::ppu::tile::packed_len(entry.width(), entry.height());
        let end = start.saturating_add(need).min(sprites.len());
        &sprites[start..end]
    }

    /// Decode one descriptor with one palette.
    pub fn decode(
        &self,
        entry: &SpriteTableEntry,
        palette_num: u32,
    ) -> Result<DecodedSprite, GfxError> {
        let palette = self.palettes.get(palette_num)?;
        let bitmap = SpriteBitmap::decode(self.packed_data(entry), entry.width(), entry.height())?;
        Ok(DecodedSprite {
            entry: *entry,
            palette_num,
            palette,
            bitmap,
        })
    }

    /// Decode every request in order, once per listed palette.
    ///
    /// Failures never stop the run: each is recorded in `report` and the
    /// next request is tried.
    pub fn collect(&self, requests: &[SpriteRequest], report: &mut RunReport) -> Vec<DecodedSprite> {
        let mut decoded = Vec::new();
        for request in requests {
            let entry = match self.table.entry(request.entry_offset) {
                Ok(entry) => entry,
                Err(err) => {
                    report.record(request.entry_offset, None, Outcome::Failed(err));
                    continue;
                }
            };
            if entry.is_empty() {
                report.record(request.entry_offset, None, Outcome::Empty);
                continue;
            }
            for &palette_num in &request.palettes {
                match self.decode(&entry, palette_num) {
                    Ok(sprite) => {
                        report.record(request.entry_offset, Some(palette_num), Outcome::Decoded);
                        decoded.push(sprite);
                    }
                    Err(err) => {
                        report.record(request.entry_offset, Some(palette_num), Outcome::Failed(err))
                    }
                }
            }
        }
        log(LogCategory::Tile, LogLevel::Info, || {
            format!("{} requests: {}", requests.len(), report.summary())
        });
        decoded
    }
}
