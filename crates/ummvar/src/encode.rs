//! JSON encoding of attribute values.
//!
//! - numeric sequences become plain number lists
//! - `"` inside strings is rewritten to `'`
//! - floats go through their shortest decimal text, so an `f32` attribute of
//!   `0.01` encodes as `0.01` rather than `0.009999999776482582`
//! - NaN and infinities encode as `null`

use netcdf_parser::AttrValue;
use serde_json::{Number, Value};

/// Replace double quotes with single quotes.
pub fn sanitize_text(text: &str) -> String {
    text.replace('"', "'")
}

pub fn f32_to_json(value: f32) -> Value {
    if !value.is_finite() {
        return Value::Null;
    }
    value
        .to_string()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

pub fn f64_to_json(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Encode an attribute value.
pub fn attr_to_json(value: &AttrValue) -> Value {
    match value {
        AttrValue::Text(s) => Value::String(sanitize_text(s)),
        AttrValue::Texts(v) => Value::Array(v.iter().map(|s| Value::String(sanitize_text(s))).collect()),
        AttrValue::Int(v) => Value::from(*v),
        AttrValue::UInt(v) => Value::from(*v),
        AttrValue::Float(v) => f32_to_json(*v),
        AttrValue::Double(v) => f64_to_json(*v),
        AttrValue::Ints(v) => Value::Array(v.iter().map(|i| Value::from(*i)).collect()),
        AttrValue::UInts(v) => Value::Array(v.iter().map(|i| Value::from(*i)).collect()),
        AttrValue::Floats(v) => Value::Array(v.iter().map(|f| f32_to_json(*f)).collect()),
        AttrValue::Doubles(v) => Value::Array(v.iter().map(|f| f64_to_json(*f)).collect()),
        AttrValue::Bytes(v) => Value::String(sanitize_text(&String::from_utf8_lossy(v))),
    }
}

/// Apply string sanitizing to every string nested in `value`.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_text(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, normalize(v))).collect()),
        other => other,
    }
}

/// Whether a rule result counts as "no value" and is left out of a record.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
