//! Per-field validation rules for raw form input.
//!
//! Each function takes the field name used in error messages and the raw
//! text as typed by the user, and returns the parsed value.

use crate::error::ValidationError;

/// Trim `raw` and reject it when nothing is left.
pub fn require(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::RequiredField { field });
    }
    Ok(value.to_string())
}

/// Trim `raw`, mapping blank to `None`.
pub fn optional(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse a finite decimal number.
pub fn number(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value = raw.trim();
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(ValidationError::InvalidFormat {
            field,
            expected: "a number",
            value: raw.to_string(),
        }),
    }
}

/// Parse a whole number.
pub fn integer(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    raw.trim().parse::<i64>().map_err(|_| ValidationError::InvalidFormat {
        field,
        expected: "an integer",
        value: raw.to_string(),
    })
}

/// Reject `value` unless `min <= value <= max`.
pub fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::Range { field, min, max, value });
    }
    Ok(value)
}

/// A number in the closed interval `[0, 100]`.
pub fn percentage(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    in_range(field, number(field, raw)?, 0.0, 100.0)
}

/// A number that may not be negative.
pub fn non_negative(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let value = number(field, raw)?;
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

/// A whole number that may not be negative.
pub fn non_negative_integer(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    let value = integer(field, raw)?;
    if value < 0 {
        return Err(ValidationError::Negative {
            field,
            value: value as f64,
        });
    }
    Ok(value)
}

/// `true` or `false`, case-insensitive.
pub fn boolean(field: &'static str, raw: &str) -> Result<bool, ValidationError> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ValidationError::InvalidFormat {
            field,
            expected: "true or false",
            value: raw.to_string(),
        })
    }
}

/// Substitute `0` for a blank numeric field before parsing it.
pub fn or_zero(raw: &str) -> &str {
    if raw.trim().is_empty() {
        "0"
    } else {
        raw
    }
}
