//! Structural mapper: best-effort conversion between [`Value`] trees and typed
//! records.
//!
//! Each record type carries a [`RecordDescriptor`], a table of members
//! (name → getter → setter → converter) built once per type. Projection walks
//! the table, looks up the same-named key in the source object, converts it, and
//! assigns it. Capture walks the same table in the other direction.
//!
//! Conversion is a projector, not a validator. It never fails as a whole:
//!
//! 1. **Directly assignable** (`Value` members): cloned as-is
//! 2. **Primitives and strings**: coerced across variants (`"42"` → `42`,
//!    `1` → `true`); an unconvertible source yields the type's zero value
//! 3. **Enums** ([`EnumValue`]): case-insensitive member name, or ordinal, or
//!    else the first declared member
//! 4. **Fixed-size arrays** (`Box<[T]>`), **sequences** (`Vec`, `VecDeque`): built
//!    element-wise from a source array, dropping elements that do not convert
//! 5. **Maps** (`HashMap`, `BTreeMap`, `IndexMap`): built entry-wise from a source
//!    object, dropping entries whose key or value does not convert
//! 6. **Nested records**: projected recursively from a source object; any other
//!    source aborts that branch and the member keeps its previous value
//!
//! A member absent from the source is left untouched, so projecting into a
//! fresh `T::default()` leaves it at its zero value.
//!
//! # Example
//! ```
//! use json_doc::{map_enum, map_record, mapper, Value};
//!
//! #[derive(Debug, Default, Clone, Copy, PartialEq)]
//! enum Class { #[default] Warrior, Mage }
//! map_enum!(Class { Warrior, Mage });
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Hero { name: String, level: u32, class: Class }
//! map_record!(Hero { name, level, class });
//!
//! let source = Value::parse(r#"{"name":"Hero","level":"25","class":"MAGE"}"#);
//! let hero: Hero = mapper::project(&source);
//! assert_eq!(hero, Hero { name: "Hero".into(), level: 25, class: Class::Mage });
//! assert_eq!(mapper::capture(&hero).to_json(false), r#"{"name":"Hero","level":25,"class":"Mage"}"#);
//! ```

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;

use indexmap::IndexMap;

use crate::serializer::format_number;
use crate::value::{Map, Value};

/// A type that can be read from and written to a [`Value`].
pub trait Mappable: Sized {
    fn to_value(&self) -> Value;

    /// Convert `value`, or return `None` to leave the target member untouched.
    fn from_value(value: &Value) -> Option<Self>;
}

// ============================================================================
// Records
// ============================================================================

type Reader<T> = Box<dyn Fn(&T) -> Value + Send + Sync>;
type Writer<T> = Box<dyn Fn(&mut T, &Value) -> bool + Send + Sync>;

/// One mapped member of a record type.
pub struct FieldDescriptor<T> {
    name: &'static str,
    read: Reader<T>,
    write: Writer<T>,
}

impl<T> FieldDescriptor<T> {
    /// The object key this member maps to.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// The member table of a record type.
pub struct RecordDescriptor<T> {
    fields: Vec<FieldDescriptor<T>>,
}

impl<T: 'static> Default for RecordDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> RecordDescriptor<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Register a member under the object key `name`.
    pub fn field<F: Mappable + 'static>(
        mut self,
        name: &'static str,
        get: fn(&T) -> &F,
        get_mut: fn(&mut T) -> &mut F,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            read: Box::new(move |record: &T| get(record).to_value()),
            write: Box::new(move |record: &mut T, value: &Value| match F::from_value(value) {
                Some(converted) => {
                    *get_mut(record) = converted;
                    true
                }
                None => false,
            }),
        });
        self
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Build an object holding every member, in registration order.
    pub fn capture(&self, record: &T) -> Value {
        let map: Map = self
            .fields
            .iter()
            .map(|field| (field.name.to_string(), (field.read)(record)))
            .collect();
        Value::Object(map)
    }

    /// Copy every same-named, convertible entry of `source` into `record`.
    ///
    /// Returns the number of members assigned. A non-object source assigns none.
    pub fn project_into(&self, source: &Value, record: &mut T) -> usize {
        let mut assigned = 0;
        for field in &self.fields {
            let Some(value) = source.get(field.name) else {
                continue;
            };
            if (field.write)(record, value) {
                assigned += 1;
            } else {
                log::debug!(
                    "mapper skipped member `{}`: cannot convert from {}",
                    field.name,
                    value.kind()
                );
            }
        }
        assigned
    }
}

/// A record type with a member table, usually implemented by [`map_record!`].
pub trait Record: Default + 'static {
    fn descriptor() -> &'static RecordDescriptor<Self>;
}

/// Capture a record as an object [`Value`].
pub fn capture<T: Record>(record: &T) -> Value {
    T::descriptor().capture(record)
}

/// Project `source` onto a fresh `T::default()`.
pub fn project<T: Record>(source: &Value) -> T {
    let mut record = T::default();
    project_into(source, &mut record);
    record
}

/// Project `source` onto an existing record, returning the members assigned.
pub fn project_into<T: Record>(source: &Value, target: &mut T) -> usize {
    T::descriptor().project_into(source, target)
}

/// Copy same-named members from one record type to another.
pub fn convert<S: Record, T: Record>(source: &S) -> T {
    project(&capture(source))
}

/// Nested-record conversion: only an object source materializes a record.
pub fn project_record<T: Record>(value: &Value) -> Option<T> {
    value.is_object().then(|| project(value))
}

/// Implement [`Record`] and [`Mappable`] for a struct from a member list.
///
/// Every listed member must implement [`Mappable`]. A member maps to the key of
/// the same name unless renamed with `member => "key"`. The type may be named by
/// a path (`save::Slot`). Generic types are not supported: the member table is
/// a single `static`, which cannot depend on type parameters.
///
/// ```
/// use json_doc::map_record;
///
/// #[derive(Default)]
/// struct Stats { health: i32, mana: i32 }
/// map_record!(Stats { health => "hp", mana });
/// ```
#[macro_export]
macro_rules! map_record {
    ($ty:path { $($field:ident $(=> $key:literal)?),* $(,)? }) => {
        impl $crate::mapper::Record for $ty {
            fn descriptor() -> &'static $crate::mapper::RecordDescriptor<Self> {
                static DESCRIPTOR: ::std::sync::OnceLock<$crate::mapper::RecordDescriptor<$ty>> =
                    ::std::sync::OnceLock::new();
                DESCRIPTOR.get_or_init(|| {
                    $crate::mapper::RecordDescriptor::<$ty>::new()
                        $(.field(
                            $crate::__record_key!($field $(, $key)?),
                            |r: &$ty| &r.$field,
                            |r: &mut $ty| &mut r.$field,
                        ))*
                })
            }
        }

        impl $crate::mapper::Mappable for $ty {
            fn to_value(&self) -> $crate::Value {
                $crate::mapper::capture(self)
            }

            fn from_value(value: &$crate::Value) -> ::std::option::Option<Self> {
                $crate::mapper::project_record(value)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_key {
    ($field:ident) => {
        stringify!($field)
    };
    ($field:ident, $key:literal) => {
        $key
    };
}

// ============================================================================
// Enums
// ============================================================================

/// A fieldless enum with a declared member list, usually implemented by
/// [`map_enum!`]. The ordinal of a member is its position in `MEMBERS`.
pub trait EnumValue: Copy + PartialEq + 'static {
    const MEMBERS: &'static [(&'static str, Self)];

    fn name(self) -> &'static str {
        Self::MEMBERS
            .iter()
            .find(|(_, member)| *member == self)
            .map_or("", |(name, _)| name)
    }

    fn ordinal(self) -> usize {
        Self::MEMBERS
            .iter()
            .position(|(_, member)| *member == self)
            .unwrap_or(0)
    }

    /// Case-insensitive lookup by member name.
    fn from_name(name: &str) -> Option<Self> {
        Self::MEMBERS
            .iter()
            .find(|(member, _)| member.eq_ignore_ascii_case(name))
            .map(|(_, member)| *member)
    }

    fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::MEMBERS.get(ordinal).map(|(_, member)| *member)
    }

    /// Name, then ordinal (numeric or numeric text), then the first member.
    fn coerce(value: &Value) -> Option<Self> {
        let matched = match value {
            Value::String(s) => {
                let s = s.trim();
                Self::from_name(s).or_else(|| s.parse::<usize>().ok().and_then(Self::from_ordinal))
            }
            Value::Number(n) if n.fract() == 0.0 && *n >= 0.0 => Self::from_ordinal(*n as usize),
            _ => None,
        };
        matched.or_else(|| Self::MEMBERS.first().map(|(_, member)| *member))
    }
}

/// Implement [`EnumValue`] and [`Mappable`] for a fieldless enum.
///
/// Members are captured by name. The type may be named by a path.
#[macro_export]
macro_rules! map_enum {
    ($ty:path { $($variant:ident),+ $(,)? }) => {
        impl $crate::mapper::EnumValue for $ty {
            const MEMBERS: &'static [(&'static str, Self)] =
                &[$((stringify!($variant), <$ty>::$variant)),+];
        }

        impl $crate::mapper::Mappable for $ty {
            fn to_value(&self) -> $crate::Value {
                $crate::Value::string($crate::mapper::EnumValue::name(*self))
            }

            fn from_value(value: &$crate::Value) -> ::std::option::Option<Self> {
                <$ty as $crate::mapper::EnumValue>::coerce(value)
            }
        }
    };
}

// ============================================================================
// Primitives
// ============================================================================

impl Mappable for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl Mappable for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        let b = match value {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => {
                let s = s.trim();
                if s.eq_ignore_ascii_case("true") {
                    true
                } else {
                    s.parse::<f64>().is_ok_and(|n| n != 0.0)
                }
            }
            _ => false,
        };
        Some(b)
    }
}

impl Mappable for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        let s = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => {
                let mut out = String::new();
                format_number(*n, &mut out);
                out
            }
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        };
        Some(s)
    }
}

impl Mappable for char {
    fn to_value(&self) -> Value {
        Value::String(self.to_string())
    }

    fn from_value(value: &Value) -> Option<Self> {
        let c = match value {
            Value::String(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => '\0',
                }
            }
            Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 => {
                char::from_u32(*n as u32).unwrap_or('\0')
            }
            _ => '\0',
        };
        Some(c)
    }
}

/// Numeric view of a source value; `None` means "use zero".
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

macro_rules! impl_mappable_int {
    ($($t:ty),*) => {
        $(
            impl Mappable for $t {
                fn to_value(&self) -> Value {
                    Value::Number(*self as f64)
                }

                fn from_value(value: &Value) -> Option<Self> {
                    if let Value::String(s) = value {
                        if let Ok(exact) = s.trim().parse::<$t>() {
                            return Some(exact);
                        }
                    }
                    // Round half to even; out-of-range sources yield zero.
                    // `MAX as f64` rounds up to 2^N for the 64-bit types, so the
                    // upper bound is `MAX + 1`, exclusive.
                    let n = numeric(value).map_or(0.0, f64::round_ties_even);
                    if n.is_finite() && n >= <$t>::MIN as f64 && n < <$t>::MAX as f64 + 1.0 {
                        Some(n as $t)
                    } else {
                        Some(0)
                    }
                }
            }
        )*
    };
}

impl_mappable_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Mappable for f64 {
    fn to_value(&self) -> Value {
        Value::Number(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(numeric(value).unwrap_or(0.0))
    }
}

impl Mappable for f32 {
    fn to_value(&self) -> Value {
        Value::Number(f64::from(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(numeric(value).unwrap_or(0.0) as f32)
    }
}

impl<T: Mappable> Mappable for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, T::to_value)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

// ============================================================================
// Sequences
// ============================================================================

/// Convert each convertible item of a source array.
fn convert_items<T: Mappable>(value: &Value) -> Option<Vec<T>> {
    let items = value.as_array()?;
    let converted: Vec<T> = items.iter().filter_map(T::from_value).collect();
    if converted.len() < items.len() {
        log::debug!(
            "mapper dropped {} of {} sequence items",
            items.len() - converted.len(),
            items.len()
        );
    }
    Some(converted)
}

impl<T: Mappable> Mappable for Vec<T> {
    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: &Value) -> Option<Self> {
        convert_items(value)
    }
}

impl<T: Mappable> Mappable for VecDeque<T> {
    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: &Value) -> Option<Self> {
        convert_items(value).map(VecDeque::from)
    }
}

/// Fixed-size arrays are allocated at the source array's length.
impl<T: Mappable> Mappable for Box<[T]> {
    fn to_value(&self) -> Value {
        Value::Array(self.iter().map(T::to_value).collect())
    }

    fn from_value(value: &Value) -> Option<Self> {
        convert_items(value).map(Vec::into_boxed_slice)
    }
}

// ============================================================================
// Maps
// ============================================================================

/// A map key that round-trips through an object key string.
pub trait MapKey: Sized {
    fn to_key(&self) -> String;

    /// `None` drops the entry.
    fn from_key(key: &str) -> Option<Self>;
}

impl MapKey for String {
    fn to_key(&self) -> String {
        self.clone()
    }

    fn from_key(key: &str) -> Option<Self> {
        Some(key.to_string())
    }
}

macro_rules! impl_map_key_int {
    ($($t:ty),*) => {
        $(
            impl MapKey for $t {
                fn to_key(&self) -> String {
                    self.to_string()
                }

                fn from_key(key: &str) -> Option<Self> {
                    key.trim().parse().ok()
                }
            }
        )*
    };
}

impl_map_key_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

fn capture_entries<'a, K, V>(entries: impl Iterator<Item = (&'a K, &'a V)>) -> Value
where
    K: MapKey + 'a,
    V: Mappable + 'a,
{
    Value::Object(entries.map(|(k, v)| (k.to_key(), v.to_value())).collect())
}

/// Convert each entry of a source object whose key and value both convert.
fn convert_entries<K: MapKey, V: Mappable>(value: &Value) -> Option<Vec<(K, V)>> {
    let map = value.as_object()?;
    let converted: Vec<(K, V)> = map
        .iter()
        .filter_map(|(k, v)| Some((K::from_key(k)?, V::from_value(v)?)))
        .collect();
    if converted.len() < map.len() {
        log::debug!(
            "mapper dropped {} of {} map entries",
            map.len() - converted.len(),
            map.len()
        );
    }
    Some(converted)
}

impl<K: MapKey + Eq + Hash, V: Mappable> Mappable for HashMap<K, V> {
    fn to_value(&self) -> Value {
        capture_entries(self.iter())
    }

    fn from_value(value: &Value) -> Option<Self> {
        convert_entries(value).map(|entries| entries.into_iter().collect())
    }
}

impl<K: MapKey + Ord, V: Mappable> Mappable for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        capture_entries(self.iter())
    }

    fn from_value(value: &Value) -> Option<Self> {
        convert_entries(value).map(|entries| entries.into_iter().collect())
    }
}

impl<K: MapKey + Eq + Hash, V: Mappable> Mappable for IndexMap<K, V> {
    fn to_value(&self) -> Value {
        capture_entries(self.iter())
    }

    fn from_value(value: &Value) -> Option<Self> {
        convert_entries(value).map(|entries| entries.into_iter().collect())
    }
}
