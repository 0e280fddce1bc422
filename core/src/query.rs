//! Conversion between URL-encoded strings and JSON mappings.
//!
//! Query strings and `application/x-www-form-urlencoded` bodies are decoded
//! into a [`Value::Object`] so they can go through the same trimming pass as
//! JSON bodies. A key that appears more than once becomes a sequence of its
//! values in order of appearance. Bracket notation (`a[b]=1`) is not
//! expanded; such keys are kept as written.
//!
//! The mapping does not remember pair order across keys or whether a pair
//! had an `=`. Encoding writes each key once, at its first position, with
//! all its values; `b=2&a=1&b=3&flag` comes back as `b=2&b=3&a=1&flag=`.

use serde_json::{Map, Value};
use url::form_urlencoded;

/// Decodes `a=1&b=2&b=3` into `{"a": "1", "b": ["2", "3"]}`.
///
/// Empty input yields an empty mapping.
#[must_use]
pub fn parse_query(input: &str) -> Value {
    parse_form(input.as_bytes())
}

/// Decodes a raw `application/x-www-form-urlencoded` body.
///
/// Invalid UTF-8 sequences are replaced rather than rejected.
#[must_use]
pub fn parse_form(input: &[u8]) -> Value {
    let mut map = Map::new();
    for (key, value) in form_urlencoded::parse(input) {
        let value = Value::String(value.into_owned());
        match map.get_mut(&*key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key.into_owned(), value);
            }
        }
    }
    Value::Object(map)
}

/// Encodes a mapping back into URL-encoded form.
///
/// Sequences are written as repeated keys. Strings are written as is,
/// `null` as an empty value, and any other value as its JSON text.
/// Returns `None` if `value` is not a mapping.
#[must_use]
pub fn encode_query(value: &Value) -> Option<String> {
    let Value::Object(map) = value else {
        return None;
    };

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in map {
        match value {
            Value::Array(items) => {
                for item in items {
                    serializer.append_pair(key, &scalar_text(item));
                }
            }
            other => {
                serializer.append_pair(key, &scalar_text(other));
            }
        }
    }
    Some(serializer.finish())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
