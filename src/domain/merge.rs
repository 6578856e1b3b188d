use crate::domain::{DiaryDocument, Upsert};
use log::debug;
use serde::Serialize;
use std::fmt;

/// Counts reported back after an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} updated, {} skipped",
            self.added, self.updated, self.skipped
        )
    }
}

/// Merge `incoming` into `target`, last write wins per date.
///
/// Records with a bad day, month or year are dropped and counted as skipped.
pub fn merge_into(target: &mut DiaryDocument, incoming: DiaryDocument) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for record in incoming.into_records() {
        let Some(entry) = record.validate() else {
            debug!(
                "Skipping import record day={:?} month={:?} year={:?}",
                record.day, record.month, record.year
            );
            summary.skipped += 1;
            continue;
        };

        match target.upsert(entry.day, entry.month, entry.year, entry.text) {
            Upsert::Inserted => summary.added += 1,
            Upsert::Updated => summary.updated += 1,
        }
    }

    summary
}
