//! API utility functions
//!
//! Request-parameter validation shared by the handlers. Everything here runs
//! before the store is touched.

use crate::error::AppError;

/// Parse an optional `n` count parameter
///
/// # Arguments
/// * `raw` - The raw query-string value, if present
/// * `default` - Value used when the parameter is absent
///
/// # Returns
/// * `Ok(n)` - A positive count
/// * `Err(AppError::Validation)` - The value is not a positive integer
pub fn parse_count(raw: Option<&str>, default: u64) -> Result<u64, AppError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::Validation(format!(
            "n must be a positive integer, got '{}'",
            raw
        ))),
    }
}

/// Require a non-blank string parameter
///
/// # Returns
/// * `Ok(value)` - The parameter trimmed of surrounding whitespace
/// * `Err(AppError::Validation)` - The parameter is missing or blank
pub fn require_param<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!(
            "Parameter '{}' is required and cannot be empty",
            name
        ))),
    }
}
