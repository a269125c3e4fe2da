//! Sprite lookup, decoding and packing.
//!
//! The pipeline every front end shares:
//!
//! 1. [`index`] turns a CSV of descriptor offsets and palette numbers into
//!    [`SpriteRequest`]s, optionally expanded over the whole table.
//! 2. [`table`] reads the descriptor for each request out of the code ROM.
//! 3. [`source`] slices the packed pixels and the palette and decodes them,
//!    recording what happened to each request in a [`RunReport`].
//! 4. [`atlas`] packs the decoded sprites into one sheet.

pub mod atlas;
pub mod index;
pub mod report;
pub mod source;
pub mod table;

pub use atlas::{build_atlas, Atlas, AtlasLayout, AtlasOptions, Placement};
pub use index::{build_full_variation_entries, load_index, parse_index, SpriteIndex, SpriteRequest};
pub use report::{EntryOutcome, Outcome, RunReport, WriteFailure};
pub use source::{DecodedSprite, SpriteSource};
pub use table::{SpriteTable, SpriteTableEntry, DESCRIPTOR_LEN};
