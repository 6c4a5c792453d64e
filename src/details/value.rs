//! Runtime representation of error details.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use serde::{Deserialize, Deserializer};

/// A details payload attached to a [`TaggedError`](crate::TaggedError).
///
/// Details are JSON-like trees. The [`Shared`](DetailValue::Shared) variant
/// aliases a node owned elsewhere, which is the only way to build graphs with
/// cycles; rendering replaces a node that is already being rendered higher up
/// the path with `"[Circular]"`.
///
/// # Example
///
/// ```rust
/// use wari::{DetailMap, DetailValue};
///
/// let text: DetailValue = "not json".into();
/// let status: DetailValue = 404.into();
/// let details = DetailValue::Object(
///     DetailMap::new().with("text", text).with("status", status),
/// );
/// assert_eq!(details.to_string(), r#"{"text":"not json","status":404}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailValue {
    /// Null value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Integer value (64-bit signed).
    Integer(i64),

    /// Unsigned integer too large for [`Integer`](DetailValue::Integer).
    Unsigned(u64),

    /// Floating-point value (64-bit).
    Float(f64),

    /// String value.
    String(String),

    /// Array of values.
    Array(Vec<DetailValue>),

    /// Object with keys kept in insertion order.
    Object(DetailMap),

    /// Reference to a node that may be aliased elsewhere in the tree.
    Shared(SharedValue),
}

impl DetailValue {
    /// Creates an empty object.
    pub fn object() -> Self {
        DetailValue::Object(DetailMap::new())
    }

    /// Returns `true` if this is a null value.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, DetailValue::Null)
    }

    /// Returns the boolean value if this is a Bool variant.
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DetailValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer value if it fits in an `i64`.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DetailValue::Integer(i) => Some(*i),
            DetailValue::Unsigned(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Returns the integer value if it is non-negative.
    #[inline]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            DetailValue::Integer(i) => u64::try_from(*i).ok(),
            DetailValue::Unsigned(u) => Some(*u),
            _ => None,
        }
    }

    /// Returns the value as a float if this is a number.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DetailValue::Float(f) => Some(*f),
            DetailValue::Integer(i) => Some(*i as f64),
            DetailValue::Unsigned(u) => Some(*u as f64),
            _ => None,
        }
    }

    /// Returns the string value if this is a String variant.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DetailValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the array if this is an Array variant.
    #[inline]
    pub fn as_array(&self) -> Option<&[DetailValue]> {
        match self {
            DetailValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Returns the object if this is an Object variant.
    #[inline]
    pub fn as_object(&self) -> Option<&DetailMap> {
        match self {
            DetailValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Returns the object mutably if this is an Object variant.
    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut DetailMap> {
        match self {
            DetailValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Returns the shared node if this is a Shared variant.
    #[inline]
    pub fn as_shared(&self) -> Option<&SharedValue> {
        match self {
            DetailValue::Shared(node) => Some(node),
            _ => None,
        }
    }

    /// Looks up `key` if this is an object.
    ///
    /// Shared nodes are not followed; use [`SharedValue::read`] for those.
    pub fn get(&self, key: &str) -> Option<&DetailValue> {
        self.as_object().and_then(|obj| obj.get(key))
    }
}

impl From<bool> for DetailValue {
    fn from(value: bool) -> Self {
        DetailValue::Bool(value)
    }
}

impl From<i32> for DetailValue {
    fn from(value: i32) -> Self {
        DetailValue::Integer(value.into())
    }
}

impl From<u32> for DetailValue {
    fn from(value: u32) -> Self {
        DetailValue::Integer(value.into())
    }
}

impl From<i64> for DetailValue {
    fn from(value: i64) -> Self {
        DetailValue::Integer(value)
    }
}

impl From<u64> for DetailValue {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => DetailValue::Integer(i),
            Err(_) => DetailValue::Unsigned(value),
        }
    }
}

impl From<f64> for DetailValue {
    fn from(value: f64) -> Self {
        DetailValue::Float(value)
    }
}

impl From<&str> for DetailValue {
    fn from(value: &str) -> Self {
        DetailValue::String(value.to_owned())
    }
}

impl From<String> for DetailValue {
    fn from(value: String) -> Self {
        DetailValue::String(value)
    }
}

impl<T: Into<DetailValue>> From<Vec<T>> for DetailValue {
    fn from(value: Vec<T>) -> Self {
        DetailValue::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<DetailValue>> From<Option<T>> for DetailValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => DetailValue::Null,
        }
    }
}

impl From<DetailMap> for DetailValue {
    fn from(value: DetailMap) -> Self {
        DetailValue::Object(value)
    }
}

impl From<SharedValue> for DetailValue {
    fn from(value: SharedValue) -> Self {
        DetailValue::Shared(value)
    }
}

impl From<serde_json::Value> for DetailValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => DetailValue::Null,
            Value::Bool(b) => DetailValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DetailValue::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    DetailValue::Unsigned(u)
                } else {
                    n.as_f64().map_or(DetailValue::Null, DetailValue::Float)
                }
            },
            Value::String(s) => DetailValue::String(s),
            Value::Array(arr) => {
                DetailValue::Array(arr.into_iter().map(DetailValue::from).collect())
            },
            Value::Object(obj) => DetailValue::Object(
                obj.into_iter()
                    .map(|(k, v)| (k, DetailValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl<'de> Deserialize<'de> for DetailValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Into::into)
    }
}

impl fmt::Display for DetailValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::render::to_json(self))
    }
}

/// An object whose keys keep their insertion order.
///
/// Inserting a key that is already present replaces its value in place, so the
/// key keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailMap {
    entries: Vec<(String, DetailValue)>,
}

impl DetailMap {
    /// Creates an empty object.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a key-value pair to the object.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<DetailValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a key-value pair, returning the previous value if the key was
    /// present.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<DetailValue>,
    ) -> Option<DetailValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            },
        }
    }

    /// Gets a value by key.
    pub fn get(&self, key: &str) -> Option<&DetailValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Removes a value by key.
    pub fn remove(&mut self, key: &str) -> Option<DetailValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Returns `true` if the object contains the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns `true` if the object is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns an iterator over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DetailValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, DetailValue)> for DetailMap {
    fn from_iter<T: IntoIterator<Item = (String, DetailValue)>>(iter: T) -> Self {
        let mut map = DetailMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for DetailMap {
    type Item = (String, DetailValue);
    type IntoIter = std::vec::IntoIter<(String, DetailValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A details node that can be referenced from several places, including from
/// inside itself.
///
/// Clones alias the same node. Two shared values are equal only when they are
/// the same node.
///
/// Nodes that form a cycle keep each other alive; break the cycle with
/// [`replace`](SharedValue::replace) when the graph is no longer needed.
///
/// # Example
///
/// ```rust
/// use wari::{DetailValue, SharedValue};
///
/// let node = SharedValue::new(DetailValue::object());
/// node.update(|value| {
///     if let Some(obj) = value.as_object_mut() {
///         obj.insert("self", node.clone());
///     }
/// });
///
/// let details = DetailValue::Shared(node.clone());
/// assert_eq!(details.to_string(), r#"{"self":"[Circular]"}"#);
/// node.replace(DetailValue::Null);
/// ```
#[derive(Clone)]
pub struct SharedValue(Arc<RwLock<DetailValue>>);

impl SharedValue {
    /// Creates a new shared node holding `value`.
    pub fn new(value: impl Into<DetailValue>) -> Self {
        Self(Arc::new(RwLock::new(value.into())))
    }

    /// Locks the node for reading.
    ///
    /// The lock is recursive, so nested reads of the same node from the same
    /// thread do not block each other.
    pub fn read(&self) -> RwLockReadGuard<'_, DetailValue> {
        self.0.read_recursive()
    }

    /// Returns a copy of the node's current value.
    ///
    /// Nested shared nodes are copied as handles, not deeply.
    pub fn get(&self) -> DetailValue {
        self.read().clone()
    }

    /// Replaces the node's value, returning the previous one.
    pub fn replace(&self, value: impl Into<DetailValue>) -> DetailValue {
        std::mem::replace(&mut *self.0.write(), value.into())
    }

    /// Mutates the node's value in place.
    ///
    /// The node is write-locked while `f` runs, so this deadlocks in two
    /// cases on the current thread:
    ///
    /// - a read guard of the same node is alive when `update` is called;
    /// - `f` reads the same node, for example by rendering it,
    ///   building a [`TaggedError`](crate::TaggedError) from a value that
    ///   contains it, or calling [`get`](SharedValue::get) on it.
    ///
    /// Cloning the handle inside `f` is fine. Use
    /// [`try_update`](SharedValue::try_update) when the lock may be held.
    pub fn update<R>(&self, f: impl FnOnce(&mut DetailValue) -> R) -> R {
        f(&mut self.0.write())
    }

    /// Mutates the node's value in place if it is not locked, returning
    /// `None` instead of blocking otherwise.
    pub fn try_update<R>(&self, f: impl FnOnce(&mut DetailValue) -> R) -> Option<R> {
        let mut guard = self.0.try_write()?;
        Some(f(&mut guard))
    }

    /// Returns `true` if both handles point at the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &SharedValue) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the node, stable for its lifetime.
    pub(crate) fn node_id(&self) -> usize {
        Arc::as_ptr(&self.0).addr()
    }
}

impl PartialEq for SharedValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for SharedValue {
    // Printing the contents could recurse forever on cyclic graphs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedValue")
            .field(&format_args!("{:#x}", self.node_id()))
            .finish()
    }
}
