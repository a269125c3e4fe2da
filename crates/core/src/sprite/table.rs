//! Sprite descriptor table reader.
//!
//! Each sprite the game can draw has a 10-byte descriptor in the code ROM
//! (all multi-byte fields big-endian):
//!
//! ```text
//! +0  ..       +1 xsize    +2 ..      +3 ysize - 1
//! +4  ..       +5 ..       +6 ..      +7 bank
//! +8  offset (u16)
//! ```
//!
//! The sprite's pixels start at `(bank * 0x10000 + offset) * 4` in the
//! joined sprite ROM. Descriptors can be addressed directly by their offset
//! in the code ROM, or through the pointer table the game itself uses.

use crate::layout::RomLayout;
use crate::logging::{log, LogCategory, LogLevel};
use crate::GfxError;

/// Bytes read from a descriptor.
pub const DESCRIPTOR_LEN: usize = 10;

/// One decoded sprite descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteTableEntry {
    /// Where the descriptor sits in the code ROM.
    pub entry_offset: usize,
    pub xsize: u8,
    /// Stored value plus one; the hardware counts lines from zero.
    pub ysize: u16,
    pub bank: u8,
    pub offset: u16,
}

impl SpriteTableEntry {
    /// Parse the descriptor at `entry_offset`.
    pub fn read(rom: &[u8], entry_offset: usize) -> Result<Self, GfxError> {
        let bytes = entry_offset
            .checked_add(DESCRIPTOR_LEN)
            .and_then(|end| rom.get(entry_offset..end))
            .ok_or(GfxError::OutOfBounds {
                offset: entry_offset,
                len: rom.len(),
            })?;

        Ok(Self {
            entry_offset,
            xsize: bytes[1],
            ysize: bytes[3] as u16 + 1,
            bank: bytes[7],
            offset: u16::from_be_bytes([bytes[8], bytes[9]]),
        })
    }

    /// Byte offset of the pixel data in the joined sprite ROM.
    pub fn data_offset(&self) -> usize {
        (self.bank as usize * 0x10000 + self.offset as usize) * 4
    }

    pub fn width(&self) -> u32 {
        self.xsize as u32
    }

    pub fn height(&self) -> u32 {
        self.ysize as u32
    }

    /// A zero-width sprite has no pixels to decode.
    pub fn is_empty(&self) -> bool {
        self.xsize == 0 || self.ysize == 0
    }
}

/// A code ROM viewed through a [`RomLayout`].
#[derive(Debug, Clone, Copy)]
pub struct SpriteTable<'a> {
    rom: &'a [u8],
    layout: RomLayout,
}

impl<'a> SpriteTable<'a> {
    pub fn new(rom: &'a [u8], layout: RomLayout) -> Self {
        Self { rom, layout }
    }

    pub fn layout(&self) -> &RomLayout {
        &self.layout
    }

    /// Descriptor at a direct code ROM offset.
    pub fn entry(&self, entry_offset: usize) -> Result<SpriteTableEntry, GfxError> {
        SpriteTableEntry::read(self.rom, entry_offset)
    }

    /// Descriptor address stored in pointer table slot `index`.
    pub fn pointer(&self, index: usize) -> Result<usize, GfxError> {
        let slot = index
            .checked_mul(self.layout.pointer_stride)
            .and_then(|o| o.checked_add(self.layout.table_base))
            .ok_or(GfxError::OutOfBounds {
                offset: usize::MAX,
                len: self.rom.len(),
            })?;
        let bytes = self
            .rom
            .get(slot..slot.saturating_add(4))
            .ok_or(GfxError::OutOfBounds {
                offset: slot,
                len: self.rom.len(),
            })?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize)
    }

    /// Descriptor for pointer table slot `index`.
    pub fn entry_by_index(&self, index: usize) -> Result<SpriteTableEntry, GfxError> {
        let entry_offset = self.pointer(index)?;
        log(LogCategory::Table, LogLevel::Debug, || {
            format!("pointer slot {} -> entry 0x{:X}", index, entry_offset)
        });
        self.entry(entry_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(xsize: u8, ysize_minus_one: u8, bank: u8, offset: u16) -> [u8; 10] {
        let [hi, lo] = offset.to_be_bytes();
        [0, xsize, 0, ysize_minus_one, 0, 0, 0, bank, hi, lo]
    }

    #[test]
    fn test_read_descriptor_fields() {
        let mut rom = vec![0xEEu8; 4];
        rom.extend_from_slice(&descriptor(32, 15, 2, 0x1234));

        let entry = SpriteTableEntry::read(&rom, 4).unwrap();
        assert_eq!(entry.entry_offset, 4);
        assert_eq!(entry.xsize, 32);
        assert_eq!(entry.ysize, 16);
        assert_eq!(entry.bank, 2);
        assert_eq!(entry.offset, 0x1234);
        assert_eq!(entry.data_offset(), (2 * 0x10000 + 0x1234) * 4);
    }

    #[test]
    fn test_ysize_255_does_not_wrap() {
        let rom = descriptor(1, 0xFF, 0, 0);
        assert_eq!(SpriteTableEntry::read(&rom, 0).unwrap().ysize, 256);
    }

    #[test]
    fn test_data_offset_formula() {
        for bank in [0u8, 1, 0x7F, 0xFF] {
            for offset in [0u16, 1, 0x8000, 0xFFFF] {
                let rom = descriptor(1, 0, bank, offset);
                let entry = SpriteTableEntry::read(&rom, 0).unwrap();
                assert_eq!(
                    entry.data_offset(),
                    (bank as usize * 65536 + offset as usize) * 4
                );
            }
        }
    }

    #[test]
    fn test_descriptor_must_fit() {
        let rom = vec![0u8; 19];
        assert!(SpriteTableEntry::read(&rom, 9).is_ok());
        assert!(matches!(
            SpriteTableEntry::read(&rom, 10),
            Err(GfxError::OutOfBounds { offset: 10, len: 19 })
        ));
        assert!(SpriteTableEntry::read(&rom, usize::MAX).is_err());
    }

    #[test]
    fn test_zero_width_is_empty() {
        let rom = descriptor(0, 7, 0, 0);
        assert!(SpriteTableEntry::read(&rom, 0).unwrap().is_empty());
    }

    #[test]
    fn test_entry_by_index_through_pointer_table() {
        let layout = RomLayout {
            table_base: 0x20,
            ..RomLayout::default()
        };
        let mut rom = vec![0u8; 0x40];
        // Slot 1 points at 0x30
        rom[0x24..0x28].copy_from_slice(&0x30u32.to_be_bytes());
        rom.extend_from_slice(&[0u8; 0x10]);
        rom[0x30..0x3A].copy_from_slice(&descriptor(8, 3, 1, 2));

        let table = SpriteTable::new(&rom, layout);
        assert_eq!(table.pointer(1).unwrap(), 0x30);
        let entry = table.entry_by_index(1).unwrap();
        assert_eq!(entry.entry_offset, 0x30);
        assert_eq!((entry.xsize, entry.ysize), (8, 4));
        assert_eq!(entry.data_offset(), (0x10000 + 2) * 4);
    }

    #[test]
    fn test_pointer_slot_past_end() {
        let rom = vec![0u8; 0x22];
        let layout = RomLayout {
            table_base: 0x20,
            ..RomLayout::default()
        };
        assert!(matches!(
            SpriteTable::new(&rom, layout).pointer(0),
            Err(GfxError::OutOfBounds { offset: 0x20, .. })
        ));
    }

    #[test]
    fn test_pointer_to_nowhere() {
        let mut rom = vec![0u8; 0x30];
        rom[0x20..0x24].copy_from_slice(&0x1000u32.to_be_bytes());
        let layout = RomLayout {
            table_base: 0x20,
            ..RomLayout::default()
        };
        assert!(matches!(
            SpriteTable::new(&rom, layout).entry_by_index(0),
            Err(GfxError::OutOfBounds { offset: 0x1000, .. })
        ));
    }
}
