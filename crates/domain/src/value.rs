//! Helpers for reading and writing untyped document trees.

use serde_json::{Map, Value};

/// Interpret a value as a finite number.
///
/// Numbers and numeric strings qualify; blank strings, booleans, `null` and
/// containers do not.
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

/// Build a JSON number, keeping integral values as integers.
///
/// `25.0` and `25` must serialize identically for migration to be idempotent.
pub fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Render a number the way a formula expects it (`2`, `-3`, `1.5`).
pub fn format_number(n: f64) -> String {
    match number(n) {
        Value::Number(num) => num.to_string(),
        _ => String::new(),
    }
}

/// JavaScript-style truthiness, used where legacy data relied on it.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Mutable access to a nested object, e.g. `object_mut(system, "uses")`.
pub fn object_mut<'a>(parent: &'a mut Map<String, Value>, key: &str) -> Option<&'a mut Map<String, Value>> {
    parent.get_mut(key).and_then(Value::as_object_mut)
}
