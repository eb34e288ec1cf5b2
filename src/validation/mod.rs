//! Validation helpers
//!
//! Calendar-correct date checks and defensive parsing of text input,
//! shared by the catalog, the daily log and the profile.

pub mod date;
pub mod input;

pub use date::{is_valid_date, parse_date, resolve_date, today, DATE_FORMAT};
pub use input::{
    parse_keywords, parse_non_negative_int, parse_positive_int, require_name, validate_keyword,
    RESERVED_CHARS,
};
