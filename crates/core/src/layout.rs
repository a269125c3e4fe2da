//! ROM layout description.
//!
//! The sprite descriptor table, the pointer table in front of it and the
//! atlas width bound differ between games running on the same board. They
//! live here as named defaults, and a front end may override any of them
//! from a JSON file.

use crate::GfxError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Offset of the sprite pointer table in the code ROM.
pub const DEFAULT_TABLE_BASE: usize = 0x11ED2;

/// Distance between two pointers in the pointer table.
pub const DEFAULT_POINTER_STRIDE: usize = 4;

/// Distance between two consecutive sprite descriptors.
pub const DEFAULT_ENTRY_SIZE: usize = 10;

/// Widest atlas row, in pixels.
pub const DEFAULT_MAX_ATLAS_WIDTH: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RomLayout {
    pub table_base: usize,
    pub pointer_stride: usize,
    pub entry_size: usize,
    pub max_atlas_width: u32,
}

impl Default for RomLayout {
    fn default() -> Self {
        Self {
            table_base: DEFAULT_TABLE_BASE,
            pointer_stride: DEFAULT_POINTER_STRIDE,
            entry_size: DEFAULT_ENTRY_SIZE,
            max_atlas_width: DEFAULT_MAX_ATLAS_WIDTH,
        }
    }
}

impl RomLayout {
    /// Parse a layout from JSON; absent fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, GfxError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GfxError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
