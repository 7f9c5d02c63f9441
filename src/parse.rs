//! Parsers for user-entered scalar fields.

use chrono::{Datelike, NaiveDate};

use crate::error::ParseError;

/// Day of the month that `current` resolves to.
pub const CURRENT_DUE_DAY: u32 = 28;

const TRUTHY: [&str; 7] = ["y", "yes", "true", "on", "1", "oui", "teraj"];
const FALSY: [&str; 7] = ["n", "no", "false", "off", "0", "non", "nemere"];

/// Parse a yes/no answer. Accepts English, French and Hungarian tokens in any case.
pub fn parse_bool(text: &str) -> Result<bool, ParseError> {
    let lower = text.to_lowercase();
    if TRUTHY.contains(&lower.as_str()) {
        return Ok(true);
    }
    if FALSY.contains(&lower.as_str()) {
        return Ok(false);
    }
    Err(ParseError::InvalidBool(text.to_string()))
}

/// Resolve a due date input relative to `today`.
///
/// `current` is the 28th of today's month; anything else must be `YYYY-MM-DD`.
pub fn parse_due(text: &str, today: NaiveDate) -> Result<NaiveDate, ParseError> {
    if text == "current" {
        return NaiveDate::from_ymd_opt(today.year(), today.month(), CURRENT_DUE_DAY)
            .ok_or_else(|| ParseError::InvalidDate(text.to_string()));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| ParseError::InvalidDate(text.to_string()))
}

/// Parse an effort counter.
pub fn parse_int(text: &str) -> Result<i64, ParseError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidNumber(text.to_string()))
}
