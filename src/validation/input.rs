//! Input parsing
//!
//! Defensive parsing for names, keywords and integer fields. Names and
//! keywords end up inside the `|`/`,`/`;` delimited data files, so the
//! delimiters are rejected up front.

use crate::error::{LedgerError, LedgerResult};

/// Characters that would break the data file layout
pub const RESERVED_CHARS: &[char] = &['|', ',', ';', '\n', '\r'];

/// Trim a name and reject empty names or names containing delimiters
pub fn require_name(name: &str) -> LedgerResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::validation("Name cannot be empty"));
    }
    if let Some(c) = trimmed.chars().find(|c| RESERVED_CHARS.contains(c)) {
        return Err(LedgerError::validation(format!(
            "Name '{}' contains reserved character {:?}",
            trimmed, c
        )));
    }
    Ok(trimmed.to_string())
}

/// Keywords are stored as-is (no case folding) but must be non-empty and
/// free of delimiters
pub fn validate_keyword(keyword: &str) -> LedgerResult<()> {
    if keyword.is_empty() {
        return Err(LedgerError::validation("Keyword cannot be empty"));
    }
    if let Some(c) = keyword.chars().find(|c| RESERVED_CHARS.contains(c)) {
        return Err(LedgerError::validation(format!(
            "Keyword '{}' contains reserved character {:?}",
            keyword, c
        )));
    }
    Ok(())
}

/// Split comma-separated keyword input, trimming each piece and dropping
/// empty ones
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse an unsigned decimal integer (digits only, no sign)
pub fn parse_non_negative_int(input: &str) -> LedgerResult<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LedgerError::validation(format!(
            "'{}' is not a non-negative whole number",
            trimmed
        )));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| LedgerError::validation(format!("'{}' is too large", trimmed)))
}

/// Parse a strictly positive integer
pub fn parse_positive_int(input: &str) -> LedgerResult<u32> {
    let value = parse_non_negative_int(input)?;
    if value == 0 {
        return Err(LedgerError::validation("Value must be greater than 0"));
    }
    Ok(value)
}
