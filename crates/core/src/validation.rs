//! Required-field checks shared by the input forms.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// A form input that the backend would reject outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A required field was left empty.
    #[error("{0} is required")]
    Missing(&'static str),
    /// A field holds a value that is not a number.
    #[error("{0} must be a number")]
    NotANumber(&'static str),
    /// A numeric field is below its minimum.
    #[error("{field} must be at least {min}")]
    BelowMinimum {
        /// Field label.
        field: &'static str,
        /// Smallest accepted value.
        min: i64,
    },
    /// E-mail address is not shaped like one.
    #[error("{0} is not a valid e-mail address")]
    InvalidEmail(String),
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex"));

/// Trimmed value of a required text field.
pub fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(trimmed)
    }
}

/// Trimmed value of an optional text field, `None` when blank.
pub fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse a required id selected from a list.
pub fn required_id(field: &'static str, value: &str) -> Result<i64, FormError> {
    required(field, value)?
        .parse()
        .map_err(|_| FormError::NotANumber(field))
}

/// Parse an optional id; blank input yields `None`.
pub fn optional_id(field: &'static str, value: &str) -> Result<Option<i64>, FormError> {
    match optional(value) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| FormError::NotANumber(field)),
        None => Ok(None),
    }
}

/// Parse a required decimal; a comma is accepted as the decimal separator.
pub fn decimal(field: &'static str, value: &str) -> Result<f64, FormError> {
    parse_decimal(field, required(field, value)?)
}

/// Parse an optional decimal; blank input yields `None`.
pub fn optional_decimal(field: &'static str, value: &str) -> Result<Option<f64>, FormError> {
    optional(value)
        .map(|raw| parse_decimal(field, &raw))
        .transpose()
}

fn parse_decimal(field: &'static str, raw: &str) -> Result<f64, FormError> {
    raw.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(FormError::NotANumber(field))
}

/// Check that `value` looks like an e-mail address.
pub fn email(field: &'static str, value: &str) -> Result<String, FormError> {
    let value = required(field, value)?;
    if EMAIL_RE.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(FormError::InvalidEmail(value.to_string()))
    }
}
