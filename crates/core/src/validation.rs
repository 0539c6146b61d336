//! Input validation helpers shared by the form-action handlers.
//!
//! Every check runs before any I/O and reports a human-readable
//! [`CoreError::Validation`] message suitable for a flash redirect.

use chrono::NaiveDate;
use lettre::Address;

use crate::coerce;
use crate::error::CoreError;
use crate::types::DbId;

/// Require a non-blank text field, returning it trimmed.
pub fn required_text(raw: Option<&str>, message: &str) -> Result<String, CoreError> {
    coerce::non_blank(raw).ok_or_else(|| CoreError::Validation(message.to_string()))
}

/// Require a well-formed UUID reference.
pub fn required_id(raw: Option<&str>, message: &str) -> Result<DbId, CoreError> {
    raw.map(str::trim)
        .and_then(|s| DbId::parse_str(s).ok())
        .ok_or_else(|| CoreError::Validation(message.to_string()))
}

/// Reject negative amounts. Absent values pass through.
pub fn non_negative(value: Option<f64>, field: &str) -> Result<Option<f64>, CoreError> {
    match value {
        Some(v) if v < 0.0 => Err(CoreError::Validation(format!(
            "{field} must not be negative"
        ))),
        other => Ok(other),
    }
}

/// Coerce a whole-number field. Blank or non-numeric text is absent; a
/// number with a fractional part is rejected.
pub fn whole_number(raw: Option<&str>, field: &str) -> Result<Option<i32>, CoreError> {
    match coerce::parse_number(raw) {
        None => Ok(None),
        Some(_) => coerce::parse_int(raw)
            .map(Some)
            .ok_or_else(|| CoreError::Validation(format!("{field} must be a whole number"))),
    }
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn date(raw: &str, field: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::Validation(format!("{field} must be a date (YYYY-MM-DD)")))
}

/// Parse an optional ISO date; blank input is `None`.
pub fn optional_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>, CoreError> {
    coerce::non_blank(raw).map(|s| date(&s, field)).transpose()
}

/// Split a comma-separated recipient list and check every address.
///
/// An empty result is allowed here; sending to nobody is rejected at
/// dispatch time instead.
pub fn recipients(raw: Option<&str>) -> Result<Vec<String>, CoreError> {
    let list = coerce::split_list(raw);
    for addr in &list {
        addr.parse::<Address>().map_err(|_| {
            CoreError::Validation(format!("Invalid recipient email address: {addr}"))
        })?;
    }
    Ok(list)
}
