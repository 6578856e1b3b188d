use crate::domain::Month;
use chrono::{Datelike, Local, NaiveDate};

/// A calendar date split into the fields stored on an `<entry>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub year: i32,
    pub month: Month,
    pub day: u32,
}

impl DateParts {
    pub fn month_index(&self) -> usize {
        self.month.index()
    }

    pub fn today() -> Self {
        let date = Local::now().date_naive();
        Self {
            year: date.year(),
            month: Month::ALL[date.month0() as usize],
            day: date.day(),
        }
    }

    /// Zero-padded `YYYY-MM-DD`. Not checked against the calendar.
    pub fn to_iso(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month.number(), self.day)
    }
}

/// Today's local date as `YYYY-MM-DD`.
pub fn iso_today() -> String {
    DateParts::today().to_iso()
}

/// Parse a strict `YYYY-MM-DD` date.
///
/// Anything else, including dates that do not exist on the calendar, is `None`.
pub fn parts_from_iso(iso: &str) -> Option<DateParts> {
    let bytes = iso.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits = |range: std::ops::Range<usize>| bytes[range].iter().all(u8::is_ascii_digit);
    if !digits(0..4) || !digits(5..7) || !digits(8..10) {
        return None;
    }

    let year: i32 = iso[0..4].parse().ok()?;
    let month: u32 = iso[5..7].parse().ok()?;
    let day: u32 = iso[8..10].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)?;

    Some(DateParts {
        year,
        month: Month::from_number(month)?,
        day,
    })
}

/// Human-readable `DD MON YYYY`, e.g. `05 JAN 2024`.
pub fn fmt_date(day: u32, month: Month, year: i32) -> String {
    format!("{:02} {} {}", day, month.code(), year)
}
