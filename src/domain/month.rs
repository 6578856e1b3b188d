use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Three-letter uppercase code used in storage and display.
    pub fn code(self) -> &'static str {
        match self {
            Month::Jan => "JAN",
            Month::Feb => "FEB",
            Month::Mar => "MAR",
            Month::Apr => "APR",
            Month::May => "MAY",
            Month::Jun => "JUN",
            Month::Jul => "JUL",
            Month::Aug => "AUG",
            Month::Sep => "SEP",
            Month::Oct => "OCT",
            Month::Nov => "NOV",
            Month::Dec => "DEC",
        }
    }

    /// Zero-based index, January = 0.
    pub fn index(self) -> usize {
        self as usize
    }

    /// One-based calendar number, as chrono counts months.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn from_number(number: u32) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|index| Self::from_index(index as usize))
    }

    /// Resolve a month attribute.
    ///
    /// Accepts the three-letter codes in any case, and the numeric months
    /// `1`..`12` (optionally zero-padded) that older diaries stored.
    pub fn from_code(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(month) = Self::ALL
            .iter()
            .copied()
            .find(|m| m.code().eq_ignore_ascii_case(raw))
        {
            return Some(month);
        }

        if !raw.is_empty() && raw.len() <= 2 && raw.bytes().all(|b| b.is_ascii_digit()) {
            return raw.parse::<u32>().ok().and_then(Self::from_number);
        }

        None
    }

    /// Like [`Month::from_code`], but unrecognized input becomes January.
    pub fn clamped(raw: &str) -> Self {
        Self::from_code(raw).unwrap_or(Month::Jan)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
