//! What happened to each requested sprite during a run.

use std::path::PathBuf;

use crate::logging::{log, LogCategory, LogLevel};
use crate::GfxError;

#[derive(Debug)]
pub enum Outcome {
    Decoded,
    /// The descriptor has a zero dimension; nothing to draw.
    Empty,
    Failed(GfxError),
}

#[derive(Debug)]
pub struct EntryOutcome {
    pub entry_offset: usize,
    /// `None` when the descriptor itself could not be used.
    pub palette_num: Option<u32>,
    pub outcome: Outcome,
}

/// A decoded sprite whose output file could not be written.
#[derive(Debug)]
pub struct WriteFailure {
    pub entry_offset: usize,
    pub palette_num: u32,
    pub path: PathBuf,
    pub error: GfxError,
}

/// Ordered record of a run: one outcome per descriptor (or per descriptor and
/// palette once the descriptor was read), plus any index rows that were
/// skipped before decoding started and any files export could not write.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<EntryOutcome>,
    pub row_issues: Vec<GfxError>,
    pub write_failures: Vec<WriteFailure>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a report that carries the rows an index load skipped.
    pub fn with_row_issues(row_issues: Vec<GfxError>) -> Self {
        Self {
            row_issues,
            ..Self::default()
        }
    }

    pub fn record(&mut self, entry_offset: usize, palette_num: Option<u32>, outcome: Outcome) {
        match &outcome {
            Outcome::Failed(err) => log(LogCategory::Table, LogLevel::Warn, || {
                format!("skipping entry 0x{:X}: {}", entry_offset, err)
            }),
            Outcome::Empty => log(LogCategory::Table, LogLevel::Debug, || {
                format!("entry 0x{:X} has no pixels", entry_offset)
            }),
            Outcome::Decoded => log(LogCategory::Tile, LogLevel::Trace, || match palette_num {
                Some(p) => format!("decoded entry 0x{:X} with palette {:02X}", entry_offset, p),
                None => format!("decoded entry 0x{:X}", entry_offset),
            }),
        }
        self.outcomes.push(EntryOutcome {
            entry_offset,
            palette_num,
            outcome,
        });
    }

    pub fn record_write_failure(&mut self, failure: WriteFailure) {
        log(LogCategory::Export, LogLevel::Warn, || {
            format!(
                "could not write {} for entry 0x{:X}: {}",
                failure.path.display(),
                failure.entry_offset,
                failure.error
            )
        });
        self.write_failures.push(failure);
    }

    pub fn decoded(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Decoded))
    }

    pub fn empty(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Empty))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|e| pred(&e.outcome)).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&EntryOutcome, &GfxError)> {
        self.outcomes.iter().filter_map(|e| match &e.outcome {
            Outcome::Failed(err) => Some((e, err)),
            _ => None,
        })
    }

    /// One-line tally for front ends.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} decoded, {} empty, {} failed, {} index rows skipped",
            self.decoded(),
            self.empty(),
            self.failed(),
            self.row_issues.len()
        );
        if !self.write_failures.is_empty() {
            line.push_str(&format!(", {} not written", self.write_failures.len()));
        }
        line
    }
}
