//! Lenient readers over block props.
//!
//! Props arrive from editors and from untrusted stored payloads; a missing
//! or mistyped key reads as its default instead of failing the render.

use pagesmith_common::Props;
use serde_json::Value;

pub trait PropsExt {
    fn text(&self, key: &str) -> &str;
    fn number(&self, key: &str, default: f64) -> f64;
    fn flag(&self, key: &str) -> bool;
    fn list(&self, key: &str) -> &[Value];
}

impl PropsExt for Props {
    fn text(&self, key: &str) -> &str {
        self.get(key).and_then(Value::as_str).unwrap_or("").trim()
    }

    fn number(&self, key: &str, default: f64) -> f64 {
        self.get(key)
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite())
            .unwrap_or(default)
    }

    fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    fn list(&self, key: &str) -> &[Value] {
        self.get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// String field of a list entry
pub fn field<'a>(entry: &'a Value, key: &str) -> &'a str {
    entry.get(key).and_then(Value::as_str).unwrap_or("").trim()
}

/// Build a props map from a `json!` object literal
pub fn object(value: Value) -> Props {
    match value {
        Value::Object(map) => map,
        _ => Props::new(),
    }
}
