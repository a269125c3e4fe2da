//! Raster helpers shared by the atlas packer and the palette sheet renderer.
//!
//! Everything here works on [`crate::types::Image`] buffers in ARGB8888.

pub mod color;
pub mod draw;
pub mod font;

pub use color::ColorOps;
