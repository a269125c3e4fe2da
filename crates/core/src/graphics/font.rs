//! Built-in 5x7 bitmap font for labels.
//!
//! Overlay labels and palette sheet captions only ever contain hexadecimal
//! digits, decimal digits, `$`, `:` and spaces, so the font covers exactly
//! that set. Lowercase hex letters render with the uppercase glyphs; any
//! other character renders blank.
//!
//! Each glyph is 7 scanlines; in each scanline byte bit 4 is the leftmost
//! pixel and bit 0 the rightmost.

/// Glyph width in pixels.
pub const GLYPH_WIDTH: u32 = 5;

/// Glyph height in pixels.
pub const GLYPH_HEIGHT: u32 = 7;

/// Horizontal distance between the origins of two consecutive glyphs.
pub const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;

const BLANK: [u8; 7] = [0; 7];

/// Get the 5x7 glyph for a character.
pub fn get_glyph(c: char) -> &'static [u8; 7] {
    match c.to_ascii_uppercase() {
        d @ '0'..='9' => &DIGITS[(d as u8 - b'0') as usize],
        h @ 'A'..='F' => &HEX_LETTERS[(h as u8 - b'A') as usize],
        ':' => &COLON,
        '$' => &DOLLAR,
        _ => &BLANK,
    }
}

/// Width in pixels of `text` rendered at `scale`, without trailing spacing.
pub fn text_width(text: &str, scale: u32) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 {
        return 0;
    }
    ((n - 1) * GLYPH_ADVANCE + GLYPH_WIDTH) * scale
}

/// Height in pixels of a line of text rendered at `scale`.
pub fn text_height(scale: u32) -> u32 {
    GLYPH_HEIGHT * scale
}

const DIGITS: [[u8; 7]; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
];

const HEX_LETTERS: [[u8; 7]; 6] = [
    [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
    [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
    [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
];

const COLON: [u8; 7] = [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000];

const DOLLAR: [u8; 7] = [0b00100, 0b01111, 0b10100, 0b01110, 0b00101, 0b11110, 0b00100];
