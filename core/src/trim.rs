//! Recursive whitespace trimming over JSON values.
//!
//! The transform walks a [`Value`] tree and rebuilds it with every string
//! leaf trimmed of leading and trailing whitespace. Keys of mappings are
//! never touched, sequences keep their length and order, and numbers,
//! booleans and `null` pass through unchanged.
//!
//! # Example
//!
//! ```
//! use request_trim_core::trim::trim;
//! use serde_json::json;
//!
//! let raw = json!({ "name": "  Alice  ", "tags": [" a ", "b "], "age": 42 });
//! let clean = trim(&raw);
//!
//! assert_eq!(clean, json!({ "name": "Alice", "tags": ["a", "b"], "age": 42 }));
//! // The input is left as it was.
//! assert_eq!(raw["name"], "  Alice  ");
//! ```

use serde_json::{Map, Value};

/// Result of a trimming pass that also tracks how much was changed.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimReport {
    /// The trimmed copy of the input.
    pub value: Value,
    /// Number of string leaves whose content changed.
    pub modified: usize,
}

impl TrimReport {
    /// Returns `true` if at least one string leaf was shortened.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.modified > 0
    }
}

/// Returns a deep copy of `value` with every string leaf trimmed.
///
/// Whitespace is whatever [`str::trim`] strips, i.e. characters with the
/// Unicode `White_Space` property. Interior whitespace is preserved.
///
/// This function is total: it never fails and never panics.
#[must_use]
pub fn trim(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_owned()),
        Value::Array(items) => Value::Array(items.iter().map(trim).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, v)| (key.clone(), trim(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
    }
}

/// Same as [`trim`], but also counts the string leaves that changed.
#[must_use]
pub fn trim_with_report(value: &Value) -> TrimReport {
    let mut modified = 0;
    let value = trim_counting(value, &mut modified);
    TrimReport { value, modified }
}

fn trim_counting(value: &Value, modified: &mut usize) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *modified += 1;
            }
            Value::String(trimmed.to_owned())
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| trim_counting(item, modified))
                .collect(),
        ),
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, v) in map {
                out.insert(key.clone(), trim_counting(v, modified));
            }
            Value::Object(out)
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone(),
    }
}

/// Trims an owned value in place and returns the number of modified leaves.
///
/// Meant for buffers the caller has just produced (for example a freshly
/// parsed request body) and nobody else can observe. Produces exactly the
/// same tree as [`trim`].
pub fn trim_in_place(value: &mut Value) -> usize {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.len() == s.len() {
                return 0;
            }
            *s = trimmed.to_owned();
            1
        }
        Value::Array(items) => items.iter_mut().map(trim_in_place).sum(),
        Value::Object(map) => map.values_mut().map(trim_in_place).sum(),
        Value::Null | Value::Bool(_) | Value::Number(_) => 0,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trims_top_level_string_field() {
        assert_eq!(
            trim(&json!({ "name": "  Alice  " })),
            json!({ "name": "Alice" })
        );
    }

    #[test]
    fn trims_every_sequence_element() {
        assert_eq!(
            trim(&json!({ "tags": [" a ", "b ", " c"] })),
            json!({ "tags": ["a", "b", "c"] })
        );
    }

    #[test]
    fn trims_nested_mappings_and_keeps_numbers() {
        assert_eq!(
            trim(&json!({ "nested": { "x": " 1 " }, "n": 42 })),
            json!({ "nested": { "x": "1" }, "n": 42 })
        );
    }

    #[test]
    fn null_passes_through() {
        assert_eq!(trim(&Value::Null), Value::Null);
    }

    #[test]
    fn empty_mapping_stays_empty() {
        assert_eq!(trim(&json!({})), json!({}));
    }

    #[test]
    fn scalars_are_unchanged() {
        for v in [json!(true), json!(false), json!(0), json!(-3.5), json!(u64::MAX)] {
            assert_eq!(trim(&v), v);
        }
    }

    #[test]
    fn keys_are_never_trimmed() {
        let out = trim(&json!({ " padded key ": " v " }));
        assert_eq!(out, json!({ " padded key ": "v" }));
    }

    #[test]
    fn interior_whitespace_is_kept() {
        assert_eq!(
            trim(&json!("\t hello   world \n")),
            json!("hello   world")
        );
    }

    #[test]
    fn unicode_whitespace_is_stripped() {
        assert_eq!(trim(&json!("\u{00A0}\u{3000}x\u{2029}")), json!("x"));
    }

    #[test]
    fn key_order_is_preserved() {
        let out = trim(&json!({ "z": " 1", "a": "2 ", "m": 3 }));
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn input_is_not_mutated() {
        let raw = json!({ "list": [" x "], "inner": { "y": " y " } });
        let snapshot = raw.clone();
        let _ = trim(&raw);
        assert_eq!(raw, snapshot);
    }

    #[test]
    fn report_counts_only_changed_leaves() {
        let report = trim_with_report(&json!({
            "a": " a",
            "b": "b",
            "c": ["  ", "c"],
            "d": { "e": "e\n" },
            "n": 1
        }));
        assert_eq!(report.modified, 3);
        assert!(report.changed());
        assert_eq!(
            report.value,
            json!({ "a": "a", "b": "b", "c": ["", "c"], "d": { "e": "e" }, "n": 1 })
        );
    }

    #[test]
    fn report_of_clean_value_is_unchanged() {
        let report = trim_with_report(&json!({ "a": "a" }));
        assert_eq!(report.modified, 0);
        assert!(!report.changed());
    }

    #[test]
    fn in_place_matches_copying_trim() {
        let raw = json!({ "a": [" 1 ", { "b": " 2" }], "c": null, "d": "  " });
        let mut owned = raw.clone();
        let modified = trim_in_place(&mut owned);
        assert_eq!(owned, trim(&raw));
        assert_eq!(modified, 3);
    }
}
