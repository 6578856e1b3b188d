use crate::domain::{DateParts, Month, fmt_date};
use serde::{Deserialize, Serialize};

/// One diary record, keyed by its calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub day: u32,
    pub month: Month,
    pub year: i32,
    pub text: String,
}

impl DiaryEntry {
    pub fn new(day: u32, month: Month, year: i32, text: impl Into<String>) -> Self {
        Self {
            day,
            month,
            year,
            text: text.into(),
        }
    }

    pub fn key(&self) -> (i32, Month, u32) {
        (self.year, self.month, self.day)
    }

    /// `DD MON YYYY`
    pub fn display_date(&self) -> String {
        fmt_date(self.day, self.month, self.year)
    }

    pub fn parts(&self) -> DateParts {
        DateParts {
            year: self.year,
            month: self.month,
            day: self.day,
        }
    }

    pub fn iso_date(&self) -> String {
        self.parts().to_iso()
    }

    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.display_date().to_lowercase().contains(&query)
            || self.text.to_lowercase().contains(&query)
    }
}

/// An `<entry>` element as found in a document: attributes are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryRecord {
    pub day: String,
    pub month: String,
    pub year: String,
    pub text: String,
}

impl EntryRecord {
    pub fn new(
        day: impl Into<String>,
        month: impl Into<String>,
        year: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            day: day.into(),
            month: month.into(),
            year: year.into(),
            text: text.into(),
        }
    }

    /// The form the store writes: plain integers and the month code.
    pub fn canonical(day: u32, month: Month, year: i32, text: impl Into<String>) -> Self {
        Self::new(day.to_string(), month.code(), year.to_string(), text)
    }

    pub fn day_number(&self) -> Option<u32> {
        parse_int(&self.day)
    }

    pub fn year_number(&self) -> Option<i32> {
        parse_int(&self.year)
    }

    pub fn is_dated(&self, day: u32, month: Month, year: i32) -> bool {
        self.day_number() == Some(day)
            && Month::from_code(&self.month) == Some(month)
            && self.year_number() == Some(year)
    }

    /// Strict conversion: day 1-31, a known month, an integer year.
    pub fn validate(&self) -> Option<DiaryEntry> {
        let day = self.day_number().filter(|d| (1..=31).contains(d))?;
        let month = Month::from_code(&self.month)?;
        let year = self.year_number()?;
        Some(DiaryEntry::new(day, month, year, self.text.clone()))
    }

    /// Lenient conversion for listing: unknown months read as January.
    pub fn normalize(&self) -> Option<DiaryEntry> {
        let day = self.day_number()?;
        let year = self.year_number()?;
        Some(DiaryEntry::new(
            day,
            Month::clamped(&self.month),
            year,
            self.text.clone(),
        ))
    }
}

impl From<DiaryEntry> for EntryRecord {
    fn from(entry: DiaryEntry) -> Self {
        Self::canonical(entry.day, entry.month, entry.year, entry.text)
    }
}

fn parse_int<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}
