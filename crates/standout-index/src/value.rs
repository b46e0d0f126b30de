//! Attribute values and their normalized key form.
//!
//! The [`Value`] enum is what an entity hands back for a named attribute.
//! Indexes never store `Value`s directly: each one is normalized into an
//! owned, hashable [`Key`] first, so that `5u8`, `5i64` and `5.0f64` all land
//! on the same branch.

use std::fmt;

use serde::{Serialize, Serializer};

/// Runtime value of an attribute, borrowed from the source entity.
///
/// # Example
///
/// ```
/// use standout_index::{Value, Number};
///
/// struct Task {
///     name: String,
///     priority: u8,
/// }
///
/// fn attribute<'a>(task: &'a Task, name: &str) -> Option<Value<'a>> {
///     match name {
///         "name" => Some(Value::String(&task.name)),
///         "priority" => Some(Value::Number(Number::U64(task.priority as u64))),
///         _ => None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Timestamp value (milliseconds since Unix epoch).
    Timestamp(Timestamp),
    /// Enum discriminant value.
    Enum(u32),
    /// Boolean value.
    Bool(bool),
    /// Attribute present but unset.
    None,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `None` value.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Normalizes this value into an index key.
    pub fn to_key(&self) -> Key {
        match self {
            Value::String(s) => Key::Str((*s).to_string()),
            Value::Number(n) => Key::from(*n),
            Value::Timestamp(ts) => Key::Int(ts.as_millis()),
            Value::Enum(d) => Key::Int(i64::from(*d)),
            Value::Bool(b) => Key::Bool(*b),
            Value::None => Key::Null,
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Number> for Value<'_> {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

/// Numeric value supporting all common numeric types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }
}

macro_rules! number_from {
    ($variant:ident as $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(n: $t) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Timestamp value represented as milliseconds since Unix epoch.
///
/// ```
/// use standout_index::Timestamp;
///
/// assert!(Timestamp(1000) < Timestamp(2000));
/// assert_eq!(Timestamp::from_secs(2).as_millis(), 2000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs * 1000)
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Returns the timestamp as seconds since Unix epoch.
    pub fn as_secs(self) -> i64 {
        self.0 / 1000
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

/// Normalized, owned form of an attribute value or an identity.
///
/// Keys are what index branches, identities and nested-map levels are keyed
/// by. Integral numbers of any width collapse to [`Key::Int`]; numbers that
/// do not fit an `i64` exactly are kept as their decimal string.
///
/// ```
/// use standout_index::{Key, Number, Value};
///
/// assert_eq!(Value::Number(Number::U64(7)).to_key(), Key::Int(7));
/// assert_eq!(Value::Number(Number::F64(7.0)).to_key(), Key::Int(7));
/// assert_eq!(Value::Number(Number::F64(7.5)).to_key(), Key::from("7.5"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Key {
    pub fn is_null(&self) -> bool {
        matches!(self, Key::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows this key back as a [`Value`], so it can go through the same
    /// normalization as attribute values.
    pub fn as_value(&self) -> Value<'_> {
        match self {
            Key::Null => Value::None,
            Key::Bool(b) => Value::Bool(*b),
            Key::Int(n) => Value::Number(Number::I64(*n)),
            Key::Str(s) => Value::String(s),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Null => Ok(()),
            Key::Bool(b) => write!(f, "{}", b),
            Key::Int(n) => write!(f, "{}", n),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Key::Null => serializer.serialize_unit(),
            Key::Bool(b) => serializer.serialize_bool(*b),
            Key::Int(n) => serializer.serialize_i64(*n),
            Key::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl From<Number> for Key {
    fn from(n: Number) -> Self {
        match n {
            Number::I64(v) => Key::Int(v),
            Number::U64(v) => i64::try_from(v)
                .map(Key::Int)
                .unwrap_or_else(|_| Key::Str(v.to_string())),
            Number::F64(v) => {
                if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64
                {
                    Key::Int(v as i64)
                } else {
                    Key::Str(v.to_string())
                }
            }
        }
    }
}

macro_rules! key_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Key {
                fn from(n: $t) -> Self {
                    Key::from(Number::from(n))
                }
            }
        )*
    };
}

key_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<bool> for Key {
    fn from(b: bool) -> Self {
        Key::Bool(b)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<&String> for Key {
    fn from(s: &String) -> Self {
        Key::Str(s.clone())
    }
}

impl From<&Key> for Key {
    fn from(k: &Key) -> Self {
        k.clone()
    }
}

impl From<Timestamp> for Key {
    fn from(ts: Timestamp) -> Self {
        Key::Int(ts.as_millis())
    }
}

impl<K: Into<Key>> From<Option<K>> for Key {
    fn from(k: Option<K>) -> Self {
        k.map(Into::into).unwrap_or(Key::Null)
    }
}

impl From<&Value<'_>> for Key {
    fn from(v: &Value<'_>) -> Self {
        v.to_key()
    }
}
