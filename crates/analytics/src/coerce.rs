//! Turning loosely-typed cells into decimals.
//!
//! Parsing happens in two explicit stages so each can be tested on its own:
//! a strict parse of the trimmed text, and a permissive parse that first
//! throws away everything that is not an ASCII digit or a decimal point.
//! A value that survives neither stage is missing, never zero.

use core_types::RawValue;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use std::str::FromStr;

/// Parses text that is already a plain decimal number, sign included.
pub fn parse_strict(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed).ok()
}

/// Strips every character except ASCII digits and `.` and parses the rest.
///
/// Signs are stripped along with currency symbols and separators, so this
/// stage only ever yields non-negative values.
pub fn parse_permissive(text: &str) -> Option<Decimal> {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if !digits.chars().any(|c| c.is_ascii_digit()) || digits.matches('.').count() > 1 {
        return None;
    }
    Decimal::from_str(&digits).ok()
}

/// Coerces a raw cell into a decimal, trying the strict stage first.
pub fn coerce(value: Option<&RawValue>) -> Option<Decimal> {
    match value? {
        RawValue::Integer(i) => Some(Decimal::from(*i)),
        RawValue::Float(f) if f.is_finite() => Decimal::from_f64(*f),
        RawValue::Float(_) => None,
        RawValue::Text(text) => parse_strict(text).or_else(|| parse_permissive(text)),
    }
}

/// Coerces a raw cell into a calendar year.
///
/// The value must be integral and fit an `i32`; `"2019.0"` is accepted,
/// `"2019.5"` is not.
pub fn coerce_year(value: Option<&RawValue>) -> Option<i32> {
    let year = coerce(value)?;
    if !year.fract().is_zero() {
        return None;
    }
    year.trunc().to_i32()
}
