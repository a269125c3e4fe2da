//! Reference sheet of every palette in a palette file.
//!
//! Each palette is a row of 16 swatches with its number in hex (`$1A`) and
//! decimal to the left. Rows fill columns top to bottom, then left to right.
//! Colour indices `0`..`F` head every column.

use super::palette::{Palette16, COLORS_PER_PALETTE};
use crate::graphics::color::{BLACK, WHITE};
use crate::graphics::draw::{draw_text, fill_rect};
use crate::graphics::font::{text_height, text_width, GLYPH_HEIGHT};
use crate::graphics::ColorOps;
use crate::logging::{log, LogCategory, LogLevel};
use crate::types::Image;

/// Geometry of the palette sheet, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteSheetLayout {
    pub image_width: u32,
    pub columns: u32,
    pub padding_top: u32,
    pub index_width: u32,
    pub column_gap: u32,
    pub row_gap: u32,
    pub extra_bottom: u32,
}

impl Default for PaletteSheetLayout {
    fn default() -> Self {
        Self {
            image_width: 3840,
            columns: 1,
            padding_top: 80,
            index_width: 130,
            column_gap: 32,
            row_gap: 8,
            extra_bottom: 16,
        }
    }
}

impl PaletteSheetLayout {
    pub fn with_columns(columns: u32) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    fn block_width(&self) -> u32 {
        let columns = self.columns.max(1);
        let usable = self
            .image_width
            .saturating_sub(self.column_gap * (columns - 1));
        usable / columns
    }

    /// Edge length of one colour swatch.
    pub fn swatch_size(&self) -> u32 {
        (self.block_width().saturating_sub(self.index_width) / COLORS_PER_PALETTE as u32).max(1)
    }

    /// Rows per column for `count` palettes.
    pub fn rows(&self, count: usize) -> u32 {
        (count as u32).div_ceil(self.columns.max(1))
    }

    pub fn image_height(&self, count: usize) -> u32 {
        let rows = self.rows(count);
        self.padding_top
            + rows * self.swatch_size()
            + self.row_gap * rows.saturating_sub(1)
            + self.extra_bottom
    }
}

/// Font scale that brings the 7px glyphs closest to `fraction` of a swatch.
fn font_scale(swatch: u32, fraction: f32) -> u32 {
    ((swatch as f32 * fraction) as u32 / GLYPH_HEIGHT).max(1)
}

/// Draw every palette onto a white sheet.
pub fn render_palette_sheet(palettes: &[Palette16], layout: &PaletteSheetLayout) -> Image {
    let columns = layout.columns.max(1);
    let swatch = layout.swatch_size();
    let block_width = layout.block_width();
    let rows = layout.rows(palettes.len());

    let hex_scale = font_scale(swatch, 0.65);
    let dec_scale = font_scale(swatch, 0.35);
    let top_scale = font_scale(swatch, 0.38);

    log(LogCategory::Palette, LogLevel::Info, || {
        format!(
            "palette sheet: {} palettes, {} columns of {} rows, {} px swatches",
            palettes.len(),
            columns,
            rows,
            swatch
        )
    });

    let mut img = Image::filled(
        layout.image_width,
        layout.image_height(palettes.len()),
        WHITE,
    );

    for col in 0..columns {
        let x0 = (col * (block_width + layout.column_gap)) as i64;
        let y = (layout.padding_top / 2) as i64 - (text_height(top_scale) / 2) as i64;
        for c in 0..COLORS_PER_PALETTE as u32 {
            let label = format!("{:X}", c);
            let center = x0 + (layout.index_width + c * swatch + swatch / 2) as i64;
            let x = center - (text_width(&label, top_scale) / 2) as i64;
            draw_text(&mut img, x, y, &label, top_scale, BLACK);
        }
    }

    for (i, palette) in palettes.iter().enumerate() {
        let i = i as u32;
        let block_col = i / rows;
        let block_row = i % rows;
        let x0 = (block_col * (block_width + layout.column_gap)) as i64;
        let y0 = (layout.padding_top + block_row * (swatch + layout.row_gap)) as i64;
        let index_center = x0 + (layout.index_width / 2) as i64;

        let hex_txt = format!("${:02X}", i);
        let dec_txt = format!("{:3}", i);
        let hex_x = index_center - (text_width(&hex_txt, hex_scale) / 2) as i64;
        let dec_x = index_center - (text_width(&dec_txt, dec_scale) / 2) as i64;
        draw_text(&mut img, hex_x, y0 + 5, &hex_txt, hex_scale, BLACK);
        draw_text(
            &mut img,
            dec_x,
            y0 + 7 + text_height(hex_scale) as i64,
            &dec_txt,
            dec_scale,
            BLACK,
        );

        for c in 0..COLORS_PER_PALETTE {
            let (r, g, b) = palette.rgb(c);
            let x = x0 + (layout.index_width + c as u32 * swatch) as i64;
            fill_rect(
                &mut img,
                x,
                y0,
                x + swatch as i64 - 1,
                y0 + swatch as i64 - 1,
                ColorOps::from_rgb(r, g, b),
            );
        }
    }

    img
}
