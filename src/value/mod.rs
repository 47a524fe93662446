// Data structures for manipulating arbitrary JSON values.

use std::fmt;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

mod de;
mod number;
mod ser;

pub(crate) use self::de::{Guard, Tripped, ValueSeed};
pub use self::number::Number;
pub use self::ser::{to_value, ValueSerializer};

/// The entries of a JSON object, in insertion order.
pub type Map = IndexMap<String, Value>;

/// Represents any valid JSON value, analogous to
/// [serde_json::Value](https://docs.serde.rs/serde_json/value/enum.Value.html).
///
/// Equality is structural. Objects only compare equal if their entries appear in the same order.
#[derive(Debug, Clone)]
pub enum Value {
    /// The `null` value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number, see [`Number`] for its range.
    Number(Number),
    /// A utf8 string.
    String(String),
    /// An array.
    Array(Vec<Value>),
    /// An order-preserving object.
    Object(Map),
}

impl Value {
    /// Whether this is `null`.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            _ => false,
        }
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// The number, if this is one.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    /// The entries, if this is an object.
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Looks up an entry of an object. Returns `None` for missing keys and non-objects.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|m| m.get(key))
    }

    /// Whether this is a string, number, boolean or null rather than a container.
    pub fn is_scalar(&self) -> bool {
        match self {
            Value::Array(_) | Value::Object(_) => false,
            _ => true,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            // IndexMap equality ignores order, objects compare entry by entry
            (Value::Object(a), Value::Object(b)) => a.len() == b.len() && a.iter().eq(b.iter()),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

macro_rules! from_integer {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

from_integer!(u8 u16 u32 u64 usize i8 i16 i32 i64 isize);

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(s: &'a str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Object(m)
    }
}

impl<K: Into<String>, V: Into<Value>> std::iter::FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Serialize for Value {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(b),
            Value::Number(ref n) => n.serialize(serializer),
            Value::String(ref s) => serializer.serialize_str(s),
            Value::Array(ref v) => {
                let mut s = serializer.serialize_seq(Some(v.len()))?;
                for inner in v {
                    s.serialize_element(inner)?;
                }
                s.end()
            }
            Value::Object(ref m) => {
                let mut s = serializer.serialize_map(Some(m.len()))?;
                for (key, value) in m {
                    s.serialize_entry(key, value)?;
                }
                s.end()
            }
        }
    }
}

/// Renders the value as compact JSON text, in insertion order and without a depth limit.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // numbers are finite and keys are strings, so this only fails if the formatter does
        let encoded = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(entries: &[(&str, Value)]) -> Value {
        entries.iter().cloned().collect()
    }

    #[test]
    fn object_equality_is_order_sensitive() {
        let ab = obj(&[("a", Value::from(1u8)), ("b", Value::from(2u8))]);
        let ba = obj(&[("b", Value::from(2u8)), ("a", Value::from(1u8))]);
        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }

    #[test]
    fn accessors() {
        let v = obj(&[
            ("name", Value::from("keen")),
            ("tags", Value::from(vec![Value::Null, Value::from(true)])),
        ]);
        assert_eq!(v.get("name").and_then(Value::as_str), Some("keen"));
        assert_eq!(v.get("tags").and_then(Value::as_array).map(Vec::len), Some(2));
        assert!(v.get("missing").is_none());
        assert!(Value::from(3u8).get("name").is_none());
        assert!(!v.is_scalar());
        assert!(Value::Null.is_scalar());
        assert!(Value::default().is_null());
        assert_eq!(Value::from(false).as_bool(), Some(false));
        assert_eq!(Value::from(-3i32).as_number().and_then(Number::as_i64), Some(-3));
    }

    #[test]
    fn display_is_compact_json() {
        let v = obj(&[("a", Value::from(vec![Value::from(1u8), Value::from("x")]))]);
        assert_eq!(v.to_string(), r#"{"a":[1,"x"]}"#);
    }

    #[test]
    fn display_ignores_the_encoding_depth_limit() {
        let depth = crate::DEFAULT_MAX_DEPTH + 1;
        let mut v = Value::Null;
        for _ in 0..depth {
            v = Value::Array(vec![v]);
        }
        let expected = format!("{}null{}", "[".repeat(depth), "]".repeat(depth));
        assert_eq!(v.to_string(), expected);
    }
}
