//! Circular-safe JSON rendering of details.

use std::cell::RefCell;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::DetailValue;

/// Placeholder written in place of a node that is its own ancestor.
pub const CIRCULAR: &str = "[Circular]";

/// Builds the message of a tagged error: `"<tag>: <json(details)>"`.
pub(crate) fn message(tag: &str, details: &DetailValue) -> String {
    format!("{tag}: {}", to_json(details))
}

/// Renders `value` as compact JSON.
pub(crate) fn to_json(value: &DetailValue) -> String {
    // Writing into a Vec cannot fail and every key is a string.
    serde_json::to_string(value).unwrap_or_else(|err| format!("\"[Unserializable: {err}]\""))
}

/// Whole floats within `i64` range print without a fractional part: `1.0`
/// renders `1` and `-0.0` renders `0`.
fn whole(f: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63

    if f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f) {
        Some(f as i64)
    } else {
        None
    }
}

impl Serialize for DetailValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let ancestors = RefCell::new(Vec::new());
        Tracked {
            value: self,
            ancestors: &ancestors,
        }
        .serialize(serializer)
    }
}

/// A value paired with the shared nodes currently open above it.
struct Tracked<'a> {
    value: &'a DetailValue,
    ancestors: &'a RefCell<Vec<usize>>,
}

impl Tracked<'_> {
    fn child<'b>(&'b self, value: &'b DetailValue) -> Tracked<'b> {
        Tracked {
            value,
            ancestors: self.ancestors,
        }
    }
}

impl Serialize for Tracked<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.value {
            DetailValue::Null => serializer.serialize_unit(),
            DetailValue::Bool(b) => serializer.serialize_bool(*b),
            DetailValue::Integer(i) => serializer.serialize_i64(*i),
            DetailValue::Unsigned(u) => serializer.serialize_u64(*u),
            DetailValue::Float(f) => match whole(*f) {
                Some(i) => serializer.serialize_i64(i),
                None if f.is_finite() => serializer.serialize_f64(*f),
                None => serializer.serialize_unit(),
            },
            DetailValue::String(s) => serializer.serialize_str(s),
            DetailValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&self.child(item))?;
                }
                seq.end()
            },
            DetailValue::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map.iter() {
                    out.serialize_entry(key, &self.child(value))?;
                }
                out.end()
            },
            DetailValue::Shared(node) => {
                let id = node.node_id();
                if self.ancestors.borrow().contains(&id) {
                    return serializer.serialize_str(CIRCULAR);
                }

                self.ancestors.borrow_mut().push(id);
                let guard = node.read();
                let result = self.child(&guard).serialize(serializer);
                drop(guard);
                self.ancestors.borrow_mut().pop();
                result
            },
        }
    }
}
