//! Calendar helpers: date parsing, month-start truncation and calendar
//! quarters.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, VahanError};

// ── Date parsing ──────────────────────────────────────────────────────────────

/// Date-only layouts accepted in input tables and on the command line.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d.%m.%Y"];

/// Date-time layouts; the time part is discarded.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a calendar date from any of the supported layouts.
///
/// Accepts plain dates (`2023-01-15`, `2023/01/15`, `15-01-2023`), bare months
/// (`2023-01`, read as the first of the month), naive date-times and RFC 3339
/// timestamps.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return Err(VahanError::DateParse("empty date".to_string()));
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    // Year-month only.
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Ok(date);
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    Err(VahanError::DateParse(s.to_string()))
}

// ── Month arithmetic ──────────────────────────────────────────────────────────

/// First calendar day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// The month start exactly `months` calendar months before `date`'s month.
///
/// Returns `None` only when the result falls outside chrono's date range.
pub fn months_back(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    month_start(date).checked_sub_months(Months::new(months))
}

// ── Quarter ───────────────────────────────────────────────────────────────────

/// A calendar quarter (`Q1` = Jan to Mar).
///
/// Ordering is chronological: by year, then quarter number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quarter {
    pub year: i32,
    /// 1 through 4.
    pub quarter: u32,
}

impl Quarter {
    /// Quarter containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: date.month0() / 3 + 1,
        }
    }

    /// The chronologically preceding quarter (Q1 rolls back to Q4 of the
    /// previous year).
    pub fn previous(&self) -> Self {
        if self.quarter <= 1 {
            Self {
                year: self.year - 1,
                quarter: 4,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter - 1,
            }
        }
    }

    /// First day of the quarter.
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, (self.quarter - 1) * 3 + 1, 1)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
