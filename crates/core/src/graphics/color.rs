//! Color operation utilities
//!
//! Colors are in ARGB8888 format (0xAARRGGBB).

/// Fully transparent black, the value of a cleared pixel.
pub const TRANSPARENT: u32 = 0x0000_0000;
pub const BLACK: u32 = 0xFF00_0000;
pub const WHITE: u32 = 0xFFFF_FFFF;
/// Outline colour used for sprite boxes.
pub const MID_GREY: u32 = 0xFF80_8080;

/// Color operation utilities
pub struct ColorOps;

impl ColorOps {
    /// Extract red channel from ARGB color
    #[inline]
    pub fn red(color: u32) -> u8 {
        ((color >> 16) & 0xFF) as u8
    }

    /// Extract green channel from ARGB color
    #[inline]
    pub fn green(color: u32) -> u8 {
        ((color >> 8) & 0xFF) as u8
    }

    /// Extract blue channel from ARGB color
    #[inline]
    pub fn blue(color: u32) -> u8 {
        (color & 0xFF) as u8
    }

    /// Extract alpha channel from ARGB color
    #[inline]
    pub fn alpha(color: u32) -> u8 {
        ((color >> 24) & 0xFF) as u8
    }

    /// Construct ARGB color from components
    #[inline]
    pub fn from_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
        ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
    }

    /// Construct RGB color with full alpha
    #[inline]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> u32 {
        0xFF000000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
    }

    /// Split into an `(r, g, b, a)` tuple.
    #[inline]
    pub fn to_rgba(color: u32) -> (u8, u8, u8, u8) {
        (
            Self::red(color),
            Self::green(color),
            Self::blue(color),
            Self::alpha(color),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_component_extraction() {
        let color = 0xAABBCCDD;

        assert_eq!(ColorOps::alpha(color), 0xAA);
        assert_eq!(ColorOps::red(color), 0xBB);
        assert_eq!(ColorOps::green(color), 0xCC);
        assert_eq!(ColorOps::blue(color), 0xDD);
        assert_eq!(ColorOps::to_rgba(color), (0xBB, 0xCC, 0xDD, 0xAA));
    }

    #[test]
    fn test_color_from_argb() {
        assert_eq!(ColorOps::from_argb(0xAA, 0xBB, 0xCC, 0xDD), 0xAABBCCDD);
    }

    #[test]
    fn test_color_from_rgb() {
        assert_eq!(ColorOps::from_rgb(0xBB, 0xCC, 0xDD), 0xFFBBCCDD);
        assert_eq!(ColorOps::from_rgb(128, 128, 128), MID_GREY);
    }
}
