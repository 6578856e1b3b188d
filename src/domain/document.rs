use crate::domain::{DiaryEntry, EntryRecord, Month};

/// Result of writing text at a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Updated,
}

/// The whole diary, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiaryDocument {
    records: Vec<EntryRecord>,
}

impl DiaryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<EntryRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[EntryRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EntryRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: EntryRecord) {
        self.records.push(record);
    }

    fn position(&self, day: u32, month: Month, year: i32) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.is_dated(day, month, year))
    }

    /// First record stored at this date.
    pub fn find(&self, day: u32, month: Month, year: i32) -> Option<&EntryRecord> {
        self.position(day, month, year).map(|i| &self.records[i])
    }

    /// Overwrite the text at this date, or append a new record.
    pub fn upsert(&mut self, day: u32, month: Month, year: i32, text: impl Into<String>) -> Upsert {
        match self.position(day, month, year) {
            Some(i) => {
                self.records[i].text = text.into();
                Upsert::Updated
            }
            None => {
                self.records
                    .push(EntryRecord::canonical(day, month, year, text));
                Upsert::Inserted
            }
        }
    }

    /// Every record that can be placed on a calendar, with months normalized.
    pub fn enumerate(&self) -> Vec<DiaryEntry> {
        self.records.iter().filter_map(EntryRecord::normalize).collect()
    }
}
