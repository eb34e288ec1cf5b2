//! Date validation
//!
//! Dates are stored and keyed as `DD/MM/YYYY` strings.

use chrono::{Local, NaiveDate};

use crate::error::{LedgerError, LedgerResult};

/// chrono format string matching the stored date layout
pub const DATE_FORMAT: &str = "%d/%m/%Y";

const MIN_YEAR: i32 = 1900;

/// Check a `DD/MM/YYYY` date string.
///
/// Exactly 10 characters, `/` at positions 2 and 5, digits elsewhere,
/// year >= 1900 and a day that exists in that month (leap years included).
pub fn is_valid_date(date: &str) -> bool {
    parse_date(date).is_some()
}

/// Parse a `DD/MM/YYYY` string into a calendar date, applying the same rules
/// as [`is_valid_date`].
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    let bytes = date.as_bytes();
    if bytes.len() != 10 {
        return None;
    }

    for (i, b) in bytes.iter().enumerate() {
        let ok = match i {
            2 | 5 => *b == b'/',
            _ => b.is_ascii_digit(),
        };
        if !ok {
            return None;
        }
    }

    // All slices below are ASCII digits, so the parses only fail on overflow
    let day: u32 = date[0..2].parse().ok()?;
    let month: u32 = date[3..5].parse().ok()?;
    let year: i32 = date[6..10].parse().ok()?;

    if year < MIN_YEAR {
        return None;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Today's local date as `DD/MM/YYYY`
pub fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

/// Resolve user-supplied date input: blank means `today`, anything else
/// must be a valid date.
pub fn resolve_date(input: &str, today: &str) -> LedgerResult<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(today.to_string());
    }
    if !is_valid_date(trimmed) {
        return Err(LedgerError::validation(format!(
            "Invalid date '{}': expected a valid date in the format DD/MM/YYYY",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}
