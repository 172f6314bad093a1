//! Field-coercion policy shared by both pipelines.
//!
//! Raw records arrive loosely typed: numbers as padded strings, booleans
//! standing in for flags or amounts, nulls where fields were never filled.
//! These helpers are the single place that coercion policy lives. They
//! never panic and signal failure with `None`; callers decide whether a
//! failure drops the record or falls back to a default.

use serde_json::Value;

/// Upper bound (exclusive) for floats that can name an `i64`: 2^63.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Coerce a value to `f64`.
///
/// Accepted shapes:
/// - numbers, as-is
/// - strings, trimmed then parsed with the standard float grammar
///   (decimal, scientific notation, `inf`/`nan` spellings)
/// - booleans, as `1.0` / `0.0`
///
/// Null, arrays, and objects never coerce.
pub fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Coerce a value to an integer, rejecting anything fractional.
///
/// Integral JSON numbers pass through exactly. Everything else goes
/// through [`to_f64`] and must land on a whole value inside the `i64`
/// range: `12.0` and `" 42 "` coerce, `12.5` and `1e19` do not. Values
/// are never truncated or rounded.
pub fn to_whole_i64(value: &Value) -> Option<i64> {
    if let Value::Number(n) = value {
        if let Some(i) = n.as_i64() {
            return Some(i);
        }
    }
    let f = to_f64(value)?;
    if f.fract() != 0.0 || !(-I64_LIMIT..I64_LIMIT).contains(&f) {
        return None;
    }
    Some(f as i64)
}

/// Extract a trimmed, non-blank string slice.
///
/// Only genuine strings qualify; numbers and other scalars are not
/// stringified here. Whitespace-only content counts as blank.
pub fn non_blank_str(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        }
        _ => None,
    }
}
