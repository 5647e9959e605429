//! Element normalization and plain-value equality.
//!
//! [`normalize`] turns an element into plain data by probing its
//! conversion capabilities in a fixed order:
//!
//! ```text
//! to-array  >  to-string  >  to-int  >  display  >  plain
//! ```
//!
//! Only the first capability that applies is used. The comparison helpers
//! in this module operate on normalized values: [`strict_eq`] requires type
//! and value to match, [`loose_eq`] coerces between numbers, numeric
//! strings, booleans and null.

use serde_json::{Number, Value};

use crate::convert::Element;

/// Converts an element to its plain-data form.
///
/// The array form of an array-convertible element is returned as is; it is
/// not normalized recursively.
pub fn normalize<E: Element + ?Sized>(element: &E) -> Value {
    if let Some(array) = element.as_to_array() {
        return array.to_array();
    }
    if let Some(string) = element.as_to_string() {
        return Value::String(string.to_string_value());
    }
    if let Some(int) = element.as_to_int() {
        return Value::from(int.to_int());
    }
    if let Some(display) = element.as_display() {
        return Value::String(display.to_string());
    }
    element.plain()
}

/// Stable serialized form of a plain value.
///
/// Two values are the same for [`diff`](crate::Collection::diff) purposes
/// iff their serialized forms are byte-identical.
pub fn serialized(value: &Value) -> String {
    value.to_string()
}

/// Type-and-value equality.
///
/// `1` and `1.0` are different under strict comparison.
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => number_strict_eq(x, y),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| strict_eq(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y)
                    .all(|((kx, vx), (ky, vy))| kx == ky && strict_eq(vx, vy))
        }
        _ => a == b,
    }
}

/// Value-only equality with scalar coercion.
///
/// - numbers compare numerically regardless of integer/float representation
/// - a number equals a numeric string with the same value
/// - two numeric strings compare numerically (`"1e1" == "10"`)
/// - a boolean equals any value with the same truthiness
/// - null equals any falsy value except the string `"0"`
/// - arrays compare element-wise, objects key-by-key (order-insensitive)
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), other) | (other, Value::Bool(x)) => *x == truthy(other),
        (Value::Null, Value::String(s)) | (Value::String(s), Value::Null) => s.is_empty(),
        (Value::Null, other) | (other, Value::Null) => !truthy(other),
        (Value::Number(x), Value::Number(y)) => number_loose_eq(x, y),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            match numeric_string(s) {
                Some(parsed) => n.as_f64() == Some(parsed),
                None => n.to_string() == *s,
            }
        }
        (Value::String(x), Value::String(y)) => match (numeric_string(x), numeric_string(y)) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| loose_eq(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(key, vx)| y.get(key).is_some_and(|vy| loose_eq(vx, vy)))
        }
        _ => false,
    }
}

/// Returns whether `needle` is among `haystack` under the chosen equality.
pub fn contains(haystack: &[Value], needle: &Value, strict: bool) -> bool {
    if strict {
        haystack.iter().any(|value| strict_eq(value, needle))
    } else {
        haystack.iter().any(|value| loose_eq(value, needle))
    }
}

/// Truthiness of a plain value.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn number_strict_eq(x: &Number, y: &Number) -> bool {
    match (x.is_f64(), y.is_f64()) {
        (false, false) => x == y,
        (true, true) => x.as_f64() == y.as_f64(),
        _ => false,
    }
}

fn number_loose_eq(x: &Number, y: &Number) -> bool {
    match (x.as_i64(), y.as_i64()) {
        (Some(x), Some(y)) => x == y,
        _ => match (x.as_u64(), y.as_u64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
    }
}

fn numeric_string(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}
