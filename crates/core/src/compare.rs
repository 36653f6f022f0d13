//! Value normalization and tolerance-based numeric equality.
//!
//! The two vendor APIs represent the "same" value with different types,
//! casing, and precision (Lightspeed serves costs as strings, Zoho as
//! numbers; names differ in whitespace and case). Normalization keeps
//! formatting noise from producing false-positive diffs.

use serde_json::Value;
use tracing::warn;

/// Default tolerance for numeric comparison, in currency units.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Canonicalize a scalar value for equality comparison.
///
/// - `null` or empty string become the empty string (treated as "absent")
/// - strings are trimmed and lowercased
/// - floating-point numbers are rounded to 2 decimal places
/// - all other values pass through unchanged
#[must_use]
pub fn normalize(value: &Value) -> Value {
    match value {
        Value::Null => Value::String(String::new()),
        Value::String(s) => Value::String(s.trim().to_lowercase()),
        Value::Number(n) => match n.as_f64() {
            // Integer-typed numbers pass through untouched.
            Some(f) if n.is_f64() => serde_json::Number::from_f64(round_to_cents(f))
                .map_or_else(|| value.clone(), Value::Number),
            _ => value.clone(),
        },
        _ => value.clone(),
    }
}

/// Compare two values as floating-point numbers within [`DEFAULT_TOLERANCE`].
///
/// Both values are coerced to `f64` (numbers directly, strings parsed after
/// trimming). A value that cannot be coerced makes the comparison `false`,
/// not an error; the failure is logged and the caller carries on.
#[must_use]
pub fn numbers_approx_equal(a: &Value, b: &Value) -> bool {
    numbers_approx_equal_within(a, b, DEFAULT_TOLERANCE)
}

/// [`numbers_approx_equal`] with an explicit tolerance.
#[must_use]
pub fn numbers_approx_equal_within(a: &Value, b: &Value, tolerance: f64) -> bool {
    match (coerce_f64(a), coerce_f64(b)) {
        (Some(a), Some(b)) => floats_within_tolerance(a, b, tolerance),
        _ => {
            warn!(left = %a, right = %b, "cannot coerce values to floats for comparison");
            false
        }
    }
}

/// Absolute-difference tolerance check on already-coerced floats.
#[must_use]
pub fn floats_within_tolerance(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
