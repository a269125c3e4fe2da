//! Sprite atlas packing.
//!
//! Sprites are laid out left to right in request order and wrap onto a new
//! row when the next one would cross the width bound. Within a row every
//! sprite sits on the row's baseline, so sprites of different heights line up
//! at their feet. With labels enabled, each row is followed by a band holding
//! the descriptor offset and palette under every sprite.

use super::source::DecodedSprite;
use crate::graphics::color::{BLACK, MID_GREY, WHITE};
use crate::graphics::draw::{blit, draw_text_outlined, rect_outline};
use crate::graphics::font::text_width;
use crate::layout::DEFAULT_MAX_ATLAS_WIDTH;
use crate::logging::{log, LogCategory, LogLevel};
use crate::types::Image;

/// Height of the label band under each row.
pub const LABEL_HEIGHT: u32 = 14;

/// Gap between the bottom of a row and the top of its labels.
const LABEL_GAP: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasOptions {
    /// Gap around and between sprites.
    pub padding: u32,
    /// Rows wrap before crossing this width, less the padding.
    pub max_width: u32,
    /// Reserve a label band under each row and render the label overlay.
    pub labels: bool,
    /// Render the box overlay.
    pub boxes: bool,
}

impl Default for AtlasOptions {
    fn default() -> Self {
        Self {
            padding: 16,
            max_width: DEFAULT_MAX_ATLAS_WIDTH,
            labels: false,
            boxes: false,
        }
    }
}

impl AtlasOptions {
    fn label_height(&self) -> u32 {
        if self.labels {
            LABEL_HEIGHT
        } else {
            0
        }
    }
}

/// What the packer needs to know about one sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasItem {
    pub entry_offset: usize,
    pub palette_num: u32,
    pub width: u32,
    pub height: u32,
}

impl From<&DecodedSprite> for AtlasItem {
    fn from(sprite: &DecodedSprite) -> Self {
        Self {
            entry_offset: sprite.entry_offset(),
            palette_num: sprite.palette_num,
            width: sprite.width(),
            height: sprite.height(),
        }
    }
}

/// Where one sprite lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub entry_offset: usize,
    pub palette_num: u32,
    /// Index into [`AtlasLayout::rows`].
    pub row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasRow {
    pub top: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasLayout {
    pub width: u32,
    pub height: u32,
    pub rows: Vec<AtlasRow>,
    pub placements: Vec<Placement>,
}

impl AtlasLayout {
    /// Label text for every placement, in placement order.
    ///
    /// The first sprite of a descriptor in a row is tagged `OFFSET:PP`; the
    /// sprites right after it that share the descriptor only get `PP`.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.placements.len());
        let mut last: Option<(usize, usize)> = None;
        for p in &self.placements {
            if last == Some((p.row, p.entry_offset)) {
                labels.push(format!("{:02X}", p.palette_num));
            } else {
                labels.push(format!("{:X}:{:02X}", p.entry_offset, p.palette_num));
                last = Some((p.row, p.entry_offset));
            }
        }
        labels
    }
}

/// Lay out `items` in order.
///
/// A sprite wider than the bound still gets placed, alone on its row, and the
/// atlas widens to fit it. With nothing to place the atlas is `padding`
/// square. Coordinates saturate at `u32::MAX`.
pub fn pack(items: &[AtlasItem], opts: &AtlasOptions) -> AtlasLayout {
    let pad = opts.padding;
    let bound = opts.max_width.saturating_sub(pad);
    let label_h = opts.label_height();

    let mut rows = Vec::new();
    let mut placements: Vec<Placement> = Vec::with_capacity(items.len());
    let mut x = pad;
    let mut y = pad;
    let mut row_h = 0u32;
    let mut row_start = 0usize;
    let mut width = pad;

    for (i, item) in items.iter().enumerate() {
        if i > row_start && x.saturating_add(item.width) > bound {
            close_row(&mut placements[row_start..], y, row_h);
            rows.push(AtlasRow { top: y, height: row_h });
            width = width.max(x);
            y = y.saturating_add(row_h).saturating_add(pad).saturating_add(label_h);
            x = pad;
            row_h = 0;
            row_start = i;
        }
        if i == row_start && item.width > bound {
            log(LogCategory::Atlas, LogLevel::Warn, || {
                format!(
                    "sprite 0x{:X} is {} px wide, wider than the {} px atlas bound",
                    item.entry_offset, item.width, opts.max_width
                )
            });
        }
        placements.push(Placement {
            x,
            y,
            width: item.width,
            height: item.height,
            entry_offset: item.entry_offset,
            palette_num: item.palette_num,
            row: rows.len(),
        });
        row_h = row_h.max(item.height);
        x = x.saturating_add(item.width).saturating_add(pad);
    }

    if placements.is_empty() {
        return AtlasLayout {
            width: pad.max(1),
            height: pad.max(1),
            rows,
            placements,
        };
    }
    close_row(&mut placements[row_start..], y, row_h);
    rows.push(AtlasRow { top: y, height: row_h });
    width = width.max(x);

    let height = y
        .saturating_add(row_h)
        .saturating_add(label_h)
        .saturating_add(pad);
    AtlasLayout {
        width: width.max(1),
        height: height.max(1),
        rows,
        placements,
    }
}

/// Drop every sprite of a finished row onto its baseline.
fn close_row(row: &mut [Placement], top: u32, row_h: u32) {
    for p in row {
        p.y = top.saturating_add(row_h - p.height);
    }
}

/// A rendered atlas with its optional overlays, all the same size.
#[derive(Debug, Clone)]
pub struct Atlas {
    pub layout: AtlasLayout,
    pub image: Image,
    pub overlay: Option<Image>,
    pub boxes: Option<Image>,
}

/// Pack and render `sprites`.
pub fn build_atlas(sprites: &[DecodedSprite], opts: &AtlasOptions) -> Atlas {
    let items: Vec<AtlasItem> = sprites.iter().map(AtlasItem::from).collect();
    let layout = pack(&items, opts);

    let mut image = Image::new(layout.width, layout.height);
    for (sprite, p) in sprites.iter().zip(&layout.placements) {
        blit(&mut image, &sprite.to_image(), p.x as i64, p.y as i64);
    }

    let overlay = opts.labels.then(|| render_labels(&layout));
    let boxes = opts.boxes.then(|| render_boxes(&layout));

    log(LogCategory::Atlas, LogLevel::Info, || {
        format!(
            "packed {} sprites into {} rows, {}x{}",
            layout.placements.len(),
            layout.rows.len(),
            layout.width,
            layout.height
        )
    });

    Atlas {
        layout,
        image,
        overlay,
        boxes,
    }
}

fn render_labels(layout: &AtlasLayout) -> Image {
    let mut img = Image::new(layout.width, layout.height);
    for (p, label) in layout.placements.iter().zip(layout.labels()) {
        let row = layout.rows[p.row];
        let x = p.x as i64 + (p.width as i64 - text_width(&label, 1) as i64).div_euclid(2);
        let y = row.top as i64 + row.height as i64 + LABEL_GAP as i64;
        draw_text_outlined(&mut img, x, y, &label, 1, BLACK, WHITE);
    }
    img
}

fn render_boxes(layout: &AtlasLayout) -> Image {
    let mut img = Image::new(layout.width, layout.height);
    for p in &layout.placements {
        let (x0, y0) = (p.x as i64, p.y as i64);
        rect_outline(
            &mut img,
            x0,
            y0,
            x0 + p.width as i64 - 1,
            y0 + p.height as i64 - 1,
            MID_GREY,
        );
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ppu::{Palette16, SpriteBitmap};
    use crate::sprite::table::SpriteTableEntry;

    fn item(entry_offset: usize, palette_num: u32, width: u32, height: u32) -> AtlasItem {
        AtlasItem {
            entry_offset,
            palette_num,
            width,
            height,
        }
    }

    fn opts(padding: u32, max_width: u32) -> AtlasOptions {
        AtlasOptions {
            padding,
            max_width,
            ..AtlasOptions::default()
        }
    }

    #[test]
    fn test_row_wraps_and_bottom_anchors() {
        let items = [item(0, 0, 30, 10), item(1, 0, 30, 20), item(2, 0, 30, 5)];
        let layout = pack(&items, &opts(4, 80));

        let pos: Vec<_> = layout.placements.iter().map(|p| (p.x, p.y)).collect();
        // Row 0 is 20 tall starting at y=4; the 10-tall sprite drops by 10
        assert_eq!(pos[0], (4, 14));
        assert_eq!(pos[1], (38, 4));
        // 38 + 30 + 4 = 72; 72 + 30 > 76 wraps. Next row top = 4 + 20 + 4
        assert_eq!(pos[2], (4, 28));
        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.width, 72);
        assert_eq!(layout.height, 28 + 5 + 4);
    }

    #[test]
    fn test_every_sprite_inside_bounds_and_rows_below_width() {
        let items: Vec<_> = (0..40)
            .map(|i| item(i * 10, 0, 8 + (i as u32 * 7) % 50, 4 + (i as u32 * 3) % 30))
            .collect();
        let o = opts(16, 256);
        let layout = pack(&items, &o);
        assert!(layout.width <= 256);
        for p in &layout.placements {
            let row = layout.rows[p.row];
            assert!(p.x + p.width + o.padding <= layout.width);
            assert!(p.y + p.height <= layout.height);
            assert_eq!(p.y + p.height, row.top + row.height);
            assert!(p.height <= row.height);
        }
    }

    #[test]
    fn test_label_band_adds_row_spacing() {
        let items = [item(0, 0, 30, 10), item(1, 0, 30, 10)];
        let mut o = opts(2, 40);
        o.labels = true;
        let layout = pack(&items, &o);
        assert_eq!(layout.placements[1].y, 2 + 10 + 2 + LABEL_HEIGHT);
        assert_eq!(layout.height, layout.placements[1].y + 10 + LABEL_HEIGHT + 2);
    }

    #[test]
    fn test_wide_sprite_gets_its_own_row() {
        let items = [item(0, 0, 10, 4), item(1, 0, 200, 4), item(2, 0, 10, 4)];
        let layout = pack(&items, &opts(2, 64));
        let rows: Vec<_> = layout.placements.iter().map(|p| p.row).collect();
        assert_eq!(rows, vec![0, 1, 2]);
        assert_eq!(layout.placements[1].x, 2);
        assert_eq!(layout.width, 2 + 200 + 2);
    }

    #[test]
    fn test_first_sprite_never_wraps() {
        let layout = pack(&[item(0, 0, 500, 3)], &opts(16, 64));
        assert_eq!(layout.rows.len(), 1);
        assert_eq!((layout.placements[0].x, layout.placements[0].y), (16, 16));
    }

    #[test]
    fn test_packing_is_deterministic() {
        let items: Vec<_> = (0..25).map(|i| item(i, 1, 17 + i as u32, 9)).collect();
        let o = opts(3, 128);
        assert_eq!(pack(&items, &o), pack(&items, &o));
    }

    #[test]
    fn test_empty_atlas() {
        let layout = pack(&[], &opts(16, 4096));
        assert!(layout.placements.is_empty());
        assert_eq!((layout.width, layout.height), (16, 16));
        assert!(layout.rows.is_empty());

        let layout = pack(&[], &opts(0, 4096));
        assert_eq!((layout.width, layout.height), (1, 1));
    }

    #[test]
    fn test_huge_padding_saturates() {
        let items = [item(0, 0, 10, 10), item(1, 0, 10, 10)];
        let mut o = opts(u32::MAX - 4, 4096);
        o.labels = true;
        let layout = pack(&items, &o);
        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.placements[0].x, u32::MAX - 4);
        assert_eq!(layout.placements[1].y, u32::MAX);
        assert_eq!((layout.width, layout.height), (u32::MAX, u32::MAX));
    }

    #[test]
    fn test_labels_reset_per_row() {
        let items = [
            item(0x1A2B4, 5, 20, 8),
            item(0x1A2B4, 6, 20, 8),
            item(0x1A2BE, 6, 20, 8),
            item(0x1A2BE, 7, 20, 8),
        ];
        // Third sprite wraps: 2 + 22 + 22 = 46, 46 + 20 > 60
        let layout = pack(&items, &opts(2, 62));
        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.labels(), vec!["1A2B4:05", "06", "1A2BE:06", "07"]);

        // Same descriptor split across two rows is tagged again
        let items = [item(0x10, 1, 40, 8), item(0x10, 2, 40, 8)];
        let layout = pack(&items, &opts(2, 62));
        assert_eq!(layout.labels(), vec!["10:01", "10:02"]);
    }

    fn solid_sprite(entry_offset: usize, width: u32, height: u32) -> DecodedSprite {
        let mut colors = [(0, 0, 0); 16];
        colors[1] = (255, 0, 0);
        DecodedSprite {
            entry: SpriteTableEntry {
                entry_offset,
                xsize: width as u8,
                ysize: height as u16,
                bank: 0,
                offset: 0,
            },
            palette_num: 3,
            palette: Palette16::from_colors(colors),
            bitmap: SpriteBitmap {
                width,
                height,
                indices: vec![1; (width * height) as usize],
            },
        }
    }

    #[test]
    fn test_render_with_overlays() {
        let sprites = [solid_sprite(0x20, 24, 6), solid_sprite(0x2A, 24, 12)];
        let o = AtlasOptions {
            padding: 4,
            max_width: 4096,
            labels: true,
            boxes: true,
        };
        let atlas = build_atlas(&sprites, &o);
        let (w, h) = (atlas.image.width, atlas.image.height);
        assert_eq!((w, h), (4 + 28 + 28, 4 + 12 + LABEL_HEIGHT + 4));

        // Short sprite sits on the baseline
        assert_eq!(atlas.image.get(4, 4), 0);
        assert_eq!(atlas.image.get(4, 10), 0xFFFF0000);
        assert_eq!(atlas.image.get(32, 4), 0xFFFF0000);

        let boxes = atlas.boxes.unwrap();
        assert_eq!((boxes.width, boxes.height), (w, h));
        assert_eq!(boxes.get(4, 10), MID_GREY);
        assert_eq!(boxes.get(27, 15), MID_GREY);
        assert_eq!(boxes.get(10, 12), 0);

        let overlay = atlas.overlay.unwrap();
        assert_eq!((overlay.width, overlay.height), (w, h));
        // Label band starts 2 px under the row
        let band = 4 + 12 + 2;
        assert!((0..w as i64).any(|x| overlay.get(x, band as i64) == WHITE));
        assert!(overlay.pixels[..(4 + 12) as usize * w as usize]
            .iter()
            .all(|&p| p == 0));
    }

    #[test]
    fn test_no_overlays_unless_asked() {
        let atlas = build_atlas(&[solid_sprite(0, 2, 2)], &AtlasOptions::default());
        assert!(atlas.overlay.is_none());
        assert!(atlas.boxes.is_none());
        assert_eq!((atlas.image.width, atlas.image.height), (16 + 2 + 16, 16 + 2 + 16));
    }
}
