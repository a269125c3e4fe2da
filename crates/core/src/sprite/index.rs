//! CSV sprite index.
//!
//! One row per descriptor: the descriptor's offset in the code ROM followed by
//! one or more palette numbers, all in hex. A palette cell may itself hold a
//! quoted, comma-separated list:
//!
//! ```text
//! offset,palettes
//! 1A2B4,05
//! 1A2BE,"05,06",0x07
//! ```

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::logging::{log, LogCategory, LogLevel};
use crate::GfxError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A descriptor to decode once per listed palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteRequest {
    pub entry_offset: usize,
    pub palettes: Vec<u32>,
}

impl SpriteRequest {
    pub fn new(entry_offset: usize, palettes: Vec<u32>) -> Self {
        Self {
            entry_offset,
            palettes,
        }
    }
}

/// Parsed index: the usable rows in file order plus the rows that were
/// skipped, each as a [`GfxError::MalformedRow`].
#[derive(Debug, Default)]
pub struct SpriteIndex {
    pub entries: Vec<SpriteRequest>,
    pub issues: Vec<GfxError>,
}

/// Load an index file.
pub fn load_index<P: AsRef<Path>>(path: P) -> Result<SpriteIndex, GfxError> {
    let file = std::fs::File::open(path)?;
    parse_index(file)
}

/// Parse an index from any reader.
///
/// Only I/O failures are fatal. Rows that cannot be understood are recorded
/// in [`SpriteIndex::issues`] and skipped.
pub fn parse_index<R: Read>(mut reader: R) -> Result<SpriteIndex, GfxError> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;
    let body = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw[..]);

    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body);

    let mut index = SpriteIndex::default();
    for result in csv.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                skip(&mut index, line, e.to_string());
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let first = match record.get(0) {
            Some(field) if !field.is_empty() => field,
            _ => continue,
        };
        let lower = first.to_ascii_lowercase();
        if lower.starts_with("hex") || lower.starts_with("off") {
            continue;
        }

        let entry_offset = match parse_hex(first) {
            Some(v) => v as usize,
            None => {
                skip(&mut index, line, format!("bad entry offset {:?}", first));
                continue;
            }
        };

        let mut palettes = Vec::new();
        let mut bad = None;
        for value in record.iter().skip(1).flat_map(|field| field.split(',')) {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match parse_hex(value) {
                Some(v) if v <= u32::MAX as u64 => palettes.push(v as u32),
                _ => {
                    bad = Some(value.to_string());
                    break;
                }
            }
        }
        if let Some(value) = bad {
            skip(&mut index, line, format!("bad palette {:?}", value));
            continue;
        }

        index.entries.push(SpriteRequest::new(entry_offset, palettes));
    }

    log(LogCategory::Index, LogLevel::Info, || {
        format!(
            "loaded {} index rows, skipped {}",
            index.entries.len(),
            index.issues.len()
        )
    });
    Ok(index)
}

fn skip(index: &mut SpriteIndex, line: u64, reason: String) {
    log(LogCategory::Index, LogLevel::Warn, || {
        format!("skipping row {}: {}", line, reason)
    });
    index.issues.push(GfxError::MalformedRow { line, reason });
}

/// Hex number with an optional `0x` prefix.
fn parse_hex(text: &str) -> Option<u64> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u64::from_str_radix(digits, 16).ok()
}

/// Expand an index over every descriptor between its lowest and highest
/// offset.
///
/// Offsets are visited from the lowest listed one in steps of `entry_size`.
/// A visited offset that the index lists uses its own palettes; any other
/// inherits the palettes of the closest listed offset before it. When an
/// offset is listed twice the later row wins. Listed offsets that do not
/// fall on the step grid are not visited.
pub fn build_full_variation_entries(
    entries: &[SpriteRequest],
    entry_size: usize,
) -> Vec<SpriteRequest> {
    let by_offset: BTreeMap<usize, &[u32]> = entries
        .iter()
        .map(|e| (e.entry_offset, e.palettes.as_slice()))
        .collect();

    let (min, max) = match (by_offset.keys().next(), by_offset.keys().next_back()) {
        (Some(&min), Some(&max)) => (min, max),
        _ => return Vec::new(),
    };

    let mut result = Vec::new();
    let mut current: &[u32] = &[];
    for offset in (min..=max).step_by(entry_size.max(1)) {
        if let Some(palettes) = by_offset.get(&offset) {
            current = *palettes;
        }
        result.push(SpriteRequest::new(offset, current.to_vec()));
    }

    log(LogCategory::Index, LogLevel::Debug, || {
        format!(
            "expanded {} index rows to {} entries (0x{:X}..=0x{:X})",
            entries.len(),
            result.len(),
            min,
            max
        )
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> SpriteIndex {
        parse_index(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_plain_rows() {
        let index = parse("1A2B4,05\n1A2BE,05,0A\n");
        assert_eq!(
            index.entries,
            vec![
                SpriteRequest::new(0x1A2B4, vec![5]),
                SpriteRequest::new(0x1A2BE, vec![5, 0xA]),
            ]
        );
        assert!(index.issues.is_empty());
    }

    #[test]
    fn test_headers_blank_rows_and_bom_are_ignored() {
        let text = "\u{FEFF}Offset,Palette\nhex_offset,pal\n\n,07\n100,01\n";
        let index = parse(text);
        assert_eq!(index.entries, vec![SpriteRequest::new(0x100, vec![1])]);
        assert!(index.issues.is_empty());
    }

    #[test]
    fn test_bom_before_first_data_row() {
        let index = parse("\u{FEFF}100,01\n10A,02\n");
        assert_eq!(
            index.entries,
            vec![
                SpriteRequest::new(0x100, vec![1]),
                SpriteRequest::new(0x10A, vec![2]),
            ]
        );
        assert!(index.issues.is_empty());
    }

    #[test]
    fn test_quoted_palette_lists_and_prefixes() {
        let index = parse("0x200,\"01, 02\",0x1F,\n");
        assert_eq!(index.entries, vec![SpriteRequest::new(0x200, vec![1, 2, 0x1F])]);
    }

    #[test]
    fn test_row_without_palettes_is_kept() {
        let index = parse("300\n");
        assert_eq!(index.entries, vec![SpriteRequest::new(0x300, vec![])]);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let index = parse("100,01\nzz,02\n110,0g\n120,03\n");
        assert_eq!(
            index.entries,
            vec![
                SpriteRequest::new(0x100, vec![1]),
                SpriteRequest::new(0x120, vec![3]),
            ]
        );
        assert_eq!(index.issues.len(), 2);
        assert!(matches!(
            index.issues[0],
            GfxError::MalformedRow { line: 2, .. }
        ));
        assert!(matches!(
            index.issues[1],
            GfxError::MalformedRow { line: 3, .. }
        ));
    }

    #[test]
    fn test_variations_inherit_previous_palettes() {
        let entries = vec![
            SpriteRequest::new(0x30, vec![2, 3]),
            SpriteRequest::new(0x10, vec![1]),
        ];
        let expanded = build_full_variation_entries(&entries, 0x10);
        assert_eq!(
            expanded,
            vec![
                SpriteRequest::new(0x10, vec![1]),
                SpriteRequest::new(0x20, vec![1]),
                SpriteRequest::new(0x30, vec![2, 3]),
            ]
        );
    }

    #[test]
    fn test_variations_later_duplicate_wins() {
        let entries = vec![
            SpriteRequest::new(0x0, vec![1]),
            SpriteRequest::new(0x0, vec![9]),
            SpriteRequest::new(0xA, vec![2]),
        ];
        let expanded = build_full_variation_entries(&entries, 10);
        assert_eq!(
            expanded,
            vec![
                SpriteRequest::new(0x0, vec![9]),
                SpriteRequest::new(0xA, vec![2]),
            ]
        );
    }

    #[test]
    fn test_variations_cover_range_in_steps() {
        let entries = vec![
            SpriteRequest::new(100, vec![4]),
            SpriteRequest::new(200, vec![5]),
        ];
        let expanded = build_full_variation_entries(&entries, 10);
        assert_eq!(expanded.len(), 11);
        assert!(expanded.windows(2).all(|w| w[1].entry_offset - w[0].entry_offset == 10));
        assert!(expanded[..10].iter().all(|e| e.palettes == vec![4]));
        assert_eq!(expanded[10].palettes, vec![5]);
    }

    #[test]
    fn test_variations_of_nothing() {
        assert!(build_full_variation_entries(&[], 10).is_empty());
    }
}
