//! Numeric normalization for free-text profile values
//!
//! Profile pages format counts inconsistently: `"1,496"`, `"12.7k"`,
//! `"525"`. Percentages, review counts and prices arrive embedded in
//! surrounding text and are pulled out by first match.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static FIRST_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("Integer regex is hardcoded and valid"));

static FIRST_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+\.\d+").expect("Decimal regex is hardcoded and valid"));

/// A token that could not be read as a number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read '{token}' as a number")]
pub struct NormalizeError {
    pub token: String,
}

impl NormalizeError {
    fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}

/// Parses a count in any of the formats profiles use
///
/// - contains a thousands separator: separators removed, parsed as integer
/// - contains a `k` suffix: mantissa times 1000, truncated
/// - otherwise: parsed as integer
///
/// # Examples
///
/// ```
/// use profile_harvest::extract::parse_count;
///
/// assert_eq!(parse_count("1,496"), Ok(1496));
/// assert_eq!(parse_count("12.7k"), Ok(12700));
/// assert_eq!(parse_count("525"), Ok(525));
/// ```
///
/// Counts above `i64::MAX` are rejected so every accepted value fits a
/// SQLite integer column.
pub fn parse_count(token: &str) -> Result<u64, NormalizeError> {
    let trimmed = token.trim();

    if trimmed.contains(',') {
        let value = trimmed
            .replace(',', "")
            .parse()
            .map_err(|_| NormalizeError::new(token))?;
        return within_range(value, token);
    }

    if let Some(mantissa) = trimmed
        .strip_suffix('k')
        .or_else(|| trimmed.strip_suffix('K'))
    {
        let value: f64 = mantissa
            .trim()
            .parse()
            .map_err(|_| NormalizeError::new(token))?;
        let scaled = (value * 1000.0).trunc();
        // `i64::MAX as f64` rounds up to 2^63, which is itself out of range
        if !scaled.is_finite() || scaled < 0.0 || scaled >= i64::MAX as f64 {
            return Err(NormalizeError::new(token));
        }
        return Ok(scaled as u64);
    }

    let value = trimmed.parse().map_err(|_| NormalizeError::new(token))?;
    within_range(value, token)
}

fn within_range(value: u64, token: &str) -> Result<u64, NormalizeError> {
    if value > i64::MAX as u64 {
        return Err(NormalizeError::new(token));
    }
    Ok(value)
}

/// Parses a rating such as `"4.9"` or `"5"`
pub fn parse_rating(token: &str) -> Result<f64, NormalizeError> {
    let value: f64 = token.trim().parse().map_err(|_| NormalizeError::new(token))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(NormalizeError::new(token))
    }
}

/// First run of digits in the text, e.g. `"98% response"` -> 98
pub fn first_integer(text: &str) -> Option<u64> {
    FIRST_INTEGER
        .find(text)
        .and_then(|m| parse_count(m.as_str()).ok())
}

/// First `digits.digits` token in the text, e.g. `"USD 12.50"` -> 12.5
pub fn first_decimal(text: &str) -> Option<f64> {
    FIRST_DECIMAL.find(text).and_then(|m| m.as_str().parse().ok())
}
