use anyhow::{bail, Context, Result};
use romgfx_core::export::{self, SpriteFormat};
use romgfx_core::ppu::palette::decode_palette_ram;
use romgfx_core::ppu::palette_sheet::{render_palette_sheet, PaletteSheetLayout};
use romgfx_core::ppu::tile::{packed_len, swap_nibbles_in_place};
use romgfx_core::ppu::PaletteBank;
use romgfx_core::sprite::{
    build_atlas, build_full_variation_entries, load_index, AtlasOptions, Outcome, RunReport,
    SpriteRequest, SpriteSource, SpriteTable,
};
use romgfx_core::RomLayout;
use std::fs;
use std::path::{Path, PathBuf};

use crate::SourceArgs;

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn load_layout(path: Option<&Path>) -> Result<RomLayout> {
    match path {
        Some(path) => RomLayout::load(path)
            .with_context(|| format!("loading layout {}", path.display())),
        None => Ok(RomLayout::default()),
    }
}

/// Load the index, expand it if asked, and start a report with its skipped rows.
fn load_requests(
    index: &Path,
    variations: bool,
    layout: &RomLayout,
) -> Result<(Vec<SpriteRequest>, RunReport)> {
    let index_data =
        load_index(index).with_context(|| format!("reading index {}", index.display()))?;
    let mut requests = index_data.entries;
    if variations {
        requests = build_full_variation_entries(&requests, layout.entry_size);
    }
    log::debug!("{} sprite requests from {}", requests.len(), index.display());
    Ok((requests, RunReport::with_row_issues(index_data.issues)))
}

fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let failures: Vec<_> = report
        .failures()
        .map(|(entry, err)| {
            serde_json::json!({
                "entry_offset": format!("0x{:X}", entry.entry_offset),
                "palette": entry.palette_num,
                "error": err.to_string(),
            })
        })
        .collect();
    let empty: Vec<_> = report
        .outcomes
        .iter()
        .filter(|e| matches!(e.outcome, Outcome::Empty))
        .map(|e| format!("0x{:X}", e.entry_offset))
        .collect();
    let skipped_rows: Vec<_> = report.row_issues.iter().map(|e| e.to_string()).collect();
    let not_written: Vec<_> = report
        .write_failures
        .iter()
        .map(|f| {
            serde_json::json!({
                "entry_offset": format!("0x{:X}", f.entry_offset),
                "palette": f.palette_num,
                "path": f.path.display().to_string(),
                "error": f.error.to_string(),
            })
        })
        .collect();
    let doc = serde_json::json!({
        "decoded": report.decoded(),
        "empty": empty,
        "failed": failures,
        "skipped_rows": skipped_rows,
        "not_written": not_written,
    });
    fs::write(path, serde_json::to_string_pretty(&doc)?)
        .with_context(|| format!("writing report {}", path.display()))
}

pub struct AtlasJob<'a> {
    pub source: &'a SourceArgs,
    pub index: &'a Path,
    pub output: &'a Path,
    pub padding: u32,
    pub overlay: Option<&'a Path>,
    pub boxes: Option<&'a Path>,
    pub variations: bool,
    pub layout: Option<&'a Path>,
    pub report: Option<&'a Path>,
}

pub fn atlas(job: AtlasJob) -> Result<()> {
    let layout = load_layout(job.layout)?;
    let code = read_file(&job.source.code)?;
    let sprites = read_file(&job.source.sprites)?;
    let palettes = read_file(&job.source.palettes)?;
    let (requests, mut report) = load_requests(job.index, job.variations, &layout)?;

    let source = SpriteSource::new(&code, &sprites, &palettes, layout);
    let decoded = source.collect(&requests, &mut report);

    let opts = AtlasOptions {
        padding: job.padding,
        max_width: layout.max_atlas_width,
        labels: job.overlay.is_some(),
        boxes: job.boxes.is_some(),
    };
    let atlas = build_atlas(&decoded, &opts);

    export::write_rgba_png(job.output, &atlas.image)
        .with_context(|| format!("writing {}", job.output.display()))?;
    println!("Created atlas with {} sprite variations", decoded.len());
    println!("Dimensions: {}x{}", atlas.layout.width, atlas.layout.height);

    if let (Some(path), Some(img)) = (job.overlay, &atlas.overlay) {
        export::write_rgba_png(path, img)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Code overlay saved to: {}", path.display());
    }
    if let (Some(path), Some(img)) = (job.boxes, &atlas.boxes) {
        export::write_rgba_png(path, img)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Box overlay saved to: {}", path.display());
    }

    println!("{}", report.summary());
    if let Some(path) = job.report {
        write_report(path, &report)?;
    }
    Ok(())
}

pub fn plot(
    source: &SourceArgs,
    index: usize,
    palette: u32,
    output: &Path,
    layout: Option<&Path>,
) -> Result<()> {
    let layout = load_layout(layout)?;
    let code = read_file(&source.code)?;
    let sprites = read_file(&source.sprites)?;
    let palettes = read_file(&source.palettes)?;

    let table = SpriteTable::new(&code, layout);
    let entry_addr = table
        .pointer(index)
        .with_context(|| format!("reading pointer table slot {}", index))?;
    let entry = table
        .entry(entry_addr)
        .with_context(|| format!("reading descriptor for slot {}", index))?;

    println!("Sprite table index: {}", index);
    println!("  Dimension table entry address: 0x{:X}", entry_addr);
    println!("  X size: {}", entry.xsize);
    println!("  Y size: {}", entry.ysize);
    println!(
        "  Sprite data offset (in joined sprite bin): 0x{:X}",
        entry.data_offset()
    );
    println!(
        "  Expecting {} bytes of sprite data",
        packed_len(entry.width(), entry.height())
    );

    if entry.is_empty() {
        bail!("sprite slot {} has no pixels", index);
    }
    let sprite = SpriteSource::new(&code, &sprites, &palettes, layout)
        .decode(&entry, palette)
        .with_context(|| format!("decoding sprite slot {}", index))?;

    export::write_rgba_png(output, &sprite.to_image())
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Sprite saved to {}", output.display());
    Ok(())
}

pub struct ExtractJob<'a> {
    pub source: &'a SourceArgs,
    pub index: &'a Path,
    pub output_dir: &'a Path,
    pub variations: bool,
    pub indexed: bool,
    pub layout: Option<&'a Path>,
    pub report: Option<&'a Path>,
}

pub fn extract(job: ExtractJob) -> Result<()> {
    let layout = load_layout(job.layout)?;
    let code = read_file(&job.source.code)?;
    let sprites = read_file(&job.source.sprites)?;
    let palettes = read_file(&job.source.palettes)?;
    let (requests, mut report) = load_requests(job.index, job.variations, &layout)?;

    let source = SpriteSource::new(&code, &sprites, &palettes, layout);
    let decoded = source.collect(&requests, &mut report);

    let format = if job.indexed {
        SpriteFormat::Indexed
    } else {
        SpriteFormat::Rgba
    };
    let rows = export::export_sprites(job.output_dir, &decoded, format, &mut report)
        .with_context(|| format!("writing sprites to {}", job.output_dir.display()))?;

    println!(
        "Saved {} sprites to {}",
        rows.len(),
        job.output_dir.display()
    );
    println!("Sprite info table written to {}", export::MANIFEST_NAME);
    println!("{}", report.summary());
    if let Some(path) = job.report {
        write_report(path, &report)?;
    }
    Ok(())
}

pub fn palette_decode(input: &Path, output: &Path) -> Result<()> {
    let ram = read_file(input)?;
    let rgb = decode_palette_ram(&ram);
    fs::write(output, &rgb).with_context(|| format!("writing {}", output.display()))?;
    println!(
        "Converted {} entries from {} to {}",
        rgb.len() / 3,
        input.display(),
        output.display()
    );
    Ok(())
}

pub fn palette_sheet(input: &Path, output: &Path, columns: u32) -> Result<()> {
    if columns == 0 {
        bail!("--columns must be at least 1");
    }
    let data = read_file(input)?;
    let palettes = PaletteBank::new(&data)
        .palettes()
        .with_context(|| format!("reading palettes from {}", input.display()))?;

    let sheet = render_palette_sheet(&palettes, &PaletteSheetLayout::with_columns(columns));
    export::write_rgb_png(output, &sheet)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Saved: {}", output.display());
    Ok(())
}

/// `swapped_<name>` in the same directory as `input`.
fn swapped_name(input: &Path) -> Result<PathBuf> {
    let name = input
        .file_name()
        .with_context(|| format!("{} has no file name", input.display()))?;
    let mut swapped = std::ffi::OsString::from("swapped_");
    swapped.push(name);
    Ok(input.with_file_name(swapped))
}

pub fn swap_nibbles(input: &Path, output: Option<&Path>) -> Result<()> {
    let mut data = read_file(input)?;
    swap_nibbles_in_place(&mut data);
    let output = match output {
        Some(path) => path.to_path_buf(),
        None => swapped_name(input)?,
    };
    fs::write(&output, &data).with_context(|| format!("writing {}", output.display()))?;
    println!("Processed file saved as {}", output.display());
    Ok(())
}
