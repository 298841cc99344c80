//! Calendar-date normalization for raw extracted text.
//!
//! Recognizes three patterns, in strict precedence order: `YYYY-MM-DD`,
//! `DD-MM-YYYY`, `DD/MM/YYYY`. Two-digit-leading dates are always read
//! day-first, never month-first — the primary locale writes dates day-first,
//! so `03-04-2024` means 3 April. This is a known, deliberate ambiguity
//! resolution; do not "fix" it to US ordering.

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateParseError {
    #[error("no recognizable date pattern found")]
    NoDateFound,

    #[error("matched '{candidate}' but it is not a valid calendar date")]
    InvalidCalendarDate { candidate: String },
}

/// Scans text for the first date-like token and normalizes it.
///
/// Patterns are compiled once at construction; hold one normalizer and reuse
/// it across documents.
pub struct DateNormalizer {
    iso: Regex,
    day_first_dash: Regex,
    day_first_slash: Regex,
}

impl DateNormalizer {
    pub fn new() -> Self {
        // Whitespace is tolerated around separators; token boundaries keep a
        // longer digit run (e.g. an 8-digit reference number) from matching.
        Self {
            iso: Regex::new(r"\b(\d{4})\s*-\s*(\d{2})\s*-\s*(\d{2})\b")
                .expect("ISO date pattern compiles"),
            day_first_dash: Regex::new(r"\b(\d{2})\s*-\s*(\d{2})\s*-\s*(\d{4})\b")
                .expect("day-first dash pattern compiles"),
            day_first_slash: Regex::new(r"\b(\d{2})\s*/\s*(\d{2})\s*/\s*(\d{4})\b")
                .expect("day-first slash pattern compiles"),
        }
    }

    /// Returns the first recognized date in `text` as a canonical calendar
    /// date (rendered `YYYY-MM-DD` by `Display`).
    ///
    /// The ISO form wins over the day-first forms wherever it occurs. A token
    /// that matches a pattern but names an impossible date (`31-02-2024`)
    /// fails outright; no later pattern is attempted.
    pub fn normalize(&self, text: &str) -> Result<NaiveDate, DateParseError> {
        if let Some(caps) = self.iso.captures(text) {
            return build_date(&caps[0], &caps[1], &caps[2], &caps[3]);
        }
        if let Some(caps) = self.day_first_dash.captures(text) {
            return build_date(&caps[0], &caps[3], &caps[2], &caps[1]);
        }
        if let Some(caps) = self.day_first_slash.captures(text) {
            return build_date(&caps[0], &caps[3], &caps[2], &caps[1]);
        }
        Err(DateParseError::NoDateFound)
    }
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn build_date(candidate: &str, year: &str, month: &str, day: &str) -> Result<NaiveDate, DateParseError> {
    let invalid = || DateParseError::InvalidCalendarDate {
        candidate: candidate.to_string(),
    };

    // Component widths are fixed by the patterns, so parse failures can only
    // come from overflow, which the range check below would reject anyway.
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}
