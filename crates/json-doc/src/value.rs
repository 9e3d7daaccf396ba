//! The dynamic JSON value: a tagged union with in-place mutation.
//!
//! A [`Value`] is a weakly typed slot. Mutators meant for one container variant
//! silently *promote* a receiver of any other variant: `set` on a string turns it
//! into an empty object first, `push` on a number turns it into an empty array.
//! Promotion discards the old content. The `try_*` mutators refuse to promote and
//! return [`JsonDocError::TypeMismatch`] instead.
//!
//! Objects keep their keys in insertion order. Overwriting an existing key keeps
//! its slot; new keys are appended. Readers never fail: asking a non-object for a
//! key or an array for an out-of-range index yields "absent".
//!
//! # Example
//! ```
//! use json_doc::Value;
//!
//! let mut v = Value::object();
//! v.set("a", Value::number(1.0));
//! v.set("b", Value::number(2.0));
//! v.set("a", Value::number(3.0));
//! assert_eq!(v.keys().collect::<Vec<_>>(), ["a", "b"]);
//! assert_eq!(v["a"].as_f64(), Some(3.0));
//! ```

use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;

use crate::error::{JsonDocError, Result};

/// Ordered, unique-key object storage.
pub type Map = IndexMap<String, Value>;

/// Shared null-marker handed out by the indexing operators for absent entries.
static NULL: Value = Value::Null;

/// A JSON document node.
///
/// Numbers are stored as `f64`. A value exclusively owns its children, so
/// `clone()` is a deep copy and no two slots of a tree ever alias.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    String(String),
    Number(f64),
    Bool(bool),
    /// Key-value pairs in insertion order.
    Object(Map),
    Array(Vec<Value>),
}

/// The variant tag of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    String,
    Number,
    Bool,
    Object,
    Array,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Bool => "boolean",
            ValueKind::Object => "object",
            ValueKind::Array => "array",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Construction and inspection
// ============================================================================

impl Value {
    pub fn null() -> Self {
        Value::Null
    }

    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    pub fn boolean(b: bool) -> Self {
        Value::Bool(b)
    }

    /// An empty object.
    pub fn object() -> Self {
        Value::Object(Map::new())
    }

    /// An empty array.
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// Builder form of [`Value::set`], for assembling literals.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value.into());
        self
    }

    /// Builder form of [`Value::push`].
    pub fn with_item(mut self, value: impl Into<Value>) -> Self {
        self.push(value.into());
        self
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::String(_) => ValueKind::String,
            Value::Number(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Bool,
            Value::Object(_) => ValueKind::Object,
            Value::Array(_) => ValueKind::Array,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Entry count for objects and arrays, `0` for every scalar.
    pub fn len(&self) -> usize {
        match self {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a dotted path such as `stats.health` or `inventory.0`.
    ///
    /// Each segment is an object key or, on arrays, a zero-based index. The
    /// empty path resolves to `self`.
    pub fn pointer(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }
}

// ============================================================================
// Promotion
// ============================================================================

impl Value {
    /// Turn `self` into an object unless it already is one, and return the map.
    ///
    /// Any non-object content is discarded.
    pub fn promote_to_object(&mut self) -> &mut Map {
        if !self.is_object() {
            *self = Value::object();
        }
        match self {
            Value::Object(map) => map,
            _ => unreachable!("receiver was just promoted to an object"),
        }
    }

    /// Turn `self` into an array unless it already is one, and return the items.
    ///
    /// Any non-array content is discarded.
    pub fn promote_to_array(&mut self) -> &mut Vec<Value> {
        if !self.is_array() {
            *self = Value::array();
        }
        match self {
            Value::Array(items) => items,
            _ => unreachable!("receiver was just promoted to an array"),
        }
    }
}

// ============================================================================
// Object operations
// ============================================================================

impl Value {
    /// Look up `key`. Absent keys and non-object receivers both yield `None`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.as_object_mut().and_then(|map| map.get_mut(key))
    }

    /// Store `value` under `key`, promoting a non-object receiver to `{}` first.
    ///
    /// An existing key keeps its position; a new key is appended. The value is
    /// moved in as-is.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.promote_to_object().insert(key.into(), value);
    }

    /// Like [`Value::set`], but fails instead of promoting a non-object receiver.
    pub fn try_set(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        match self {
            Value::Object(map) => {
                map.insert(key.into(), value);
                Ok(())
            }
            other => Err(JsonDocError::TypeMismatch {
                expected: ValueKind::Object,
                found: other.kind(),
            }),
        }
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.as_object().is_some_and(|map| map.contains_key(key))
    }

    /// Remove `key`, keeping the order of the remaining keys.
    ///
    /// Returns `false` when the key is absent or the receiver is not an object.
    pub fn remove(&mut self, key: &str) -> bool {
        self.take(key).is_some()
    }

    /// Remove `key` and hand back its value.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.as_object_mut().and_then(|map| map.shift_remove(key))
    }

    /// Rename `old` to `new` without moving the entry.
    ///
    /// Does nothing and returns `false` when `old` is absent, when `new` already
    /// names a different entry, or when the receiver is not an object.
    pub fn rename_key(&mut self, old: &str, new: &str) -> bool {
        let Some(map) = self.as_object_mut() else {
            return false;
        };
        if old == new {
            return map.contains_key(old);
        }
        if map.contains_key(new) {
            return false;
        }
        match map.shift_remove_full(old) {
            Some((index, _, value)) => {
                map.shift_insert(index, new.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Move the entry at position `from` to position `to`, shifting the entries
    /// in between. Out-of-range positions leave the object untouched.
    pub fn move_key(&mut self, from: usize, to: usize) -> bool {
        match self.as_object_mut() {
            Some(map) if from < map.len() && to < map.len() => {
                map.move_index(from, to);
                true
            }
            _ => false,
        }
    }

    /// Object keys in their live insertion order. Empty for non-objects.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.as_object()
            .into_iter()
            .flat_map(|map| map.keys().map(String::as_str))
    }

    /// Object entries in insertion order. Empty for non-objects.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.as_object()
            .into_iter()
            .flat_map(|map| map.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

// ============================================================================
// Array operations
// ============================================================================

impl Value {
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|items| items.get(index))
    }

    pub fn get_index_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.as_array_mut().and_then(|items| items.get_mut(index))
    }

    /// Replace the item at `index`. Out-of-range indices are ignored (the array
    /// never grows through this call) and report `false`.
    pub fn set_index(&mut self, index: usize, value: Value) -> bool {
        match self.get_index_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Append `value`, promoting a non-array receiver to `[]` first.
    pub fn push(&mut self, value: Value) {
        self.promote_to_array().push(value);
    }

    /// Like [`Value::push`], but fails instead of promoting a non-array receiver.
    pub fn try_push(&mut self, value: Value) -> Result<()> {
        match self {
            Value::Array(items) => {
                items.push(value);
                Ok(())
            }
            other => Err(JsonDocError::TypeMismatch {
                expected: ValueKind::Array,
                found: other.kind(),
            }),
        }
    }

    /// Remove the item at `index`; out-of-range indices are a no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<Value> {
        match self.as_array_mut() {
            Some(items) if index < items.len() => Some(items.remove(index)),
            _ => None,
        }
    }

    /// Insert at a clamped position: negative indices insert at the front,
    /// indices at or past the end append. Promotes a non-array receiver.
    pub fn insert_at(&mut self, index: isize, value: Value) {
        let items = self.promote_to_array();
        let at = usize::try_from(index).unwrap_or(0).min(items.len());
        items.insert(at, value);
    }

    /// Swap two array slots in place.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        match self.as_array_mut() {
            Some(items) if a < items.len() && b < items.len() => {
                items.swap(a, b);
                true
            }
            _ => false,
        }
    }

    /// Move the item at `from` to `to`, shifting the items in between.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        match self.as_array_mut() {
            Some(items) if from < items.len() && to < items.len() => {
                let item = items.remove(from);
                items.insert(to, item);
                true
            }
            _ => false,
        }
    }

    /// Array items in order. Empty for non-arrays.
    pub fn items(&self) -> impl Iterator<Item = &Value> {
        self.as_array().into_iter().flatten()
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

/// Order-sensitive structural equality: objects compare key by key in slot
/// order, so `{"a":1,"b":2}` and `{"b":2,"a":1}` differ, exactly as their
/// serializations do.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
            }
            _ => false,
        }
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.get_index(index).unwrap_or(&NULL)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
