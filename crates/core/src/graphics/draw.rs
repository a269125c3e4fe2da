//! Drawing primitives on ARGB images. All coordinates are signed and every
//! primitive clips against the destination.

use super::font::{get_glyph, GLYPH_ADVANCE, GLYPH_WIDTH};
use crate::types::Image;

/// Offsets of the 8 neighbours used for the outline stroke.
const OUTLINE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Copy `src` into `dst` with its top-left corner at `(x, y)`.
///
/// Pixels are replaced, not blended, transparent ones included.
pub fn blit(dst: &mut Image, src: &Image, x: i64, y: i64) {
    for sy in 0..src.height as i64 {
        for sx in 0..src.width as i64 {
            dst.put(x + sx, y + sy, src.get(sx, sy));
        }
    }
}

/// Fill the rectangle spanning `(x0, y0)` to `(x1, y1)`, both inclusive.
pub fn fill_rect(img: &mut Image, x0: i64, y0: i64, x1: i64, y1: i64, color: u32) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            img.put(x, y, color);
        }
    }
}

/// One pixel wide outline of the rectangle spanning `(x0, y0)` to `(x1, y1)`,
/// both inclusive.
pub fn rect_outline(img: &mut Image, x0: i64, y0: i64, x1: i64, y1: i64, color: u32) {
    for x in x0..=x1 {
        img.put(x, y0, color);
        img.put(x, y1, color);
    }
    for y in y0..=y1 {
        img.put(x0, y, color);
        img.put(x1, y, color);
    }
}

/// Render `text` with its top-left corner at `(x, y)`, each font pixel
/// expanded to a `scale` x `scale` block.
pub fn draw_text(img: &mut Image, x: i64, y: i64, text: &str, scale: u32, color: u32) {
    let scale = scale.max(1) as i64;
    let mut pen_x = x;
    for c in text.chars() {
        let glyph = get_glyph(c);
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let px = pen_x + col as i64 * scale;
                let py = y + row as i64 * scale;
                fill_rect(img, px, py, px + scale - 1, py + scale - 1, color);
            }
        }
        pen_x += GLYPH_ADVANCE as i64 * scale;
    }
}

/// Render `text` in `fill` over an 8-direction stroke in `outline`, so it
/// stays legible on any background.
pub fn draw_text_outlined(
    img: &mut Image,
    x: i64,
    y: i64,
    text: &str,
    scale: u32,
    outline: u32,
    fill: u32,
) {
    for (ox, oy) in OUTLINE_OFFSETS {
        draw_text(img, x + ox, y + oy, text, scale, outline);
    }
    draw_text(img, x, y, text, scale, fill);
}
