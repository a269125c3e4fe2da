//! PNG and CSV writers.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::logging::{log, LogCategory, LogLevel};
use crate::ppu::{Palette16, SpriteBitmap};
use crate::sprite::{DecodedSprite, RunReport, WriteFailure};
use crate::types::Image;
use crate::GfxError;

/// Name of the manifest written next to extracted sprites.
pub const MANIFEST_NAME: &str = "sprite_table.csv";

fn encoder_for(
    path: &Path,
    width: u32,
    height: u32,
) -> Result<png::Encoder<'static, BufWriter<File>>, GfxError> {
    let file = File::create(path)?;
    Ok(png::Encoder::new(BufWriter::new(file), width, height))
}

/// Write an ARGB image as an 8-bit RGBA PNG.
pub fn write_rgba_png<P: AsRef<Path>>(path: P, image: &Image) -> Result<(), GfxError> {
    let mut encoder = encoder_for(path.as_ref(), image.width, image.height)?;
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.to_rgba_bytes())?;
    writer.finish()?;
    Ok(())
}

/// Write an ARGB image as an 8-bit RGB PNG, dropping alpha.
pub fn write_rgb_png<P: AsRef<Path>>(path: P, image: &Image) -> Result<(), GfxError> {
    let mut encoder = encoder_for(path.as_ref(), image.width, image.height)?;
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.to_rgb_bytes())?;
    writer.finish()?;
    Ok(())
}

/// Pack one index per nibble, high nibble first, each row padded to a whole
/// byte as PNG requires.
fn pack_4bpp_rows(indices: &[u8], width: u32, height: u32) -> Vec<u8> {
    let width = width as usize;
    let stride = width.div_ceil(2);
    let mut out = vec![0u8; stride * height as usize];
    for (y, row) in indices.chunks(width.max(1)).take(height as usize).enumerate() {
        for (x, &index) in row.iter().enumerate() {
            let shift = if x % 2 == 0 { 4 } else { 0 };
            out[y * stride + x / 2] |= (index & 0x0F) << shift;
        }
    }
    out
}

/// Write a sprite as a 4bpp indexed PNG with its palette.
///
/// Index 15 is folded into 0 and a `tRNS` chunk makes index 0 the only
/// transparent entry.
pub fn write_indexed_png<P: AsRef<Path>>(
    path: P,
    bitmap: &SpriteBitmap,
    palette: &Palette16,
) -> Result<(), GfxError> {
    let mut encoder = encoder_for(path.as_ref(), bitmap.width, bitmap.height)?;
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Four);
    encoder.set_palette(palette.to_rgb_bytes());
    encoder.set_trns(vec![0u8]);

    let data = pack_4bpp_rows(
        &bitmap.single_transparent_indices(),
        bitmap.width,
        bitmap.height,
    );
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&data)?;
    writer.finish()?;
    Ok(())
}

/// One line of `sprite_table.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRow {
    pub filename: String,
    pub xsize: u32,
    pub ysize: u32,
    pub palette: u32,
}

const MANIFEST_HEADER: [&str; 4] = ["filename", "xsize", "ysize", "palette"];

/// Write the manifest; the header is written even when there are no rows.
pub fn write_manifest<P: AsRef<Path>>(path: P, rows: &[ManifestRow]) -> Result<(), GfxError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(MANIFEST_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// File name for the `n`th extracted sprite (counting from 1).
pub fn sprite_file_name(n: usize, palette_num: u32) -> String {
    format!("Sprite_{:04}_{}.png", n, palette_num)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteFormat {
    #[default]
    Rgba,
    Indexed,
}

/// Write every sprite to `out_dir` and a manifest beside them.
///
/// The directory is created when missing. A sprite that cannot be written is
/// recorded in `report` and skipped; file numbers count written sprites only.
/// Returns the manifest rows.
pub fn export_sprites<P: AsRef<Path>>(
    out_dir: P,
    sprites: &[DecodedSprite],
    format: SpriteFormat,
    report: &mut RunReport,
) -> Result<Vec<ManifestRow>, GfxError> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;

    let mut rows = Vec::with_capacity(sprites.len());
    for sprite in sprites {
        let filename = sprite_file_name(rows.len() + 1, sprite.palette_num);
        let path = out_dir.join(&filename);
        let written = match format {
            SpriteFormat::Rgba => write_rgba_png(&path, &sprite.to_image()),
            SpriteFormat::Indexed => write_indexed_png(&path, &sprite.bitmap, &sprite.palette),
        };
        if let Err(error) = written {
            report.record_write_failure(WriteFailure {
                entry_offset: sprite.entry_offset(),
                palette_num: sprite.palette_num,
                path,
                error,
            });
            continue;
        }
        log(LogCategory::Export, LogLevel::Debug, || {
            format!("wrote {} for entry 0x{:X}", path.display(), sprite.entry_offset())
        });
        rows.push(ManifestRow {
            filename,
            xsize: sprite.width(),
            ysize: sprite.height(),
            palette: sprite.palette_num,
        });
    }

    write_manifest(out_dir.join(MANIFEST_NAME), &rows)?;
    log(LogCategory::Export, LogLevel::Info, || {
        format!("exported {} sprites to {}", rows.len(), out_dir.display())
    });
    Ok(rows)
}
