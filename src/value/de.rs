use std::cell::Cell;
use std::fmt;

use serde::de::{
    Deserialize, DeserializeSeed, Deserializer, Error, MapAccess, SeqAccess, Visitor,
};

use super::{Map, Number, Value};
use crate::options::{DuplicateKeys, DEFAULT_MAX_DEPTH};

// The maximum capacity of entries to preallocate for arrays and objects. Even if malicious input
// claims to contain a much larger collection, only this much memory will be blindly allocated.
static MAX_ALLOC: usize = 2048;

/// Why a [`Guard`] stopped deserialization.
#[derive(PartialEq, Eq, Debug, Clone)]
pub(crate) enum Tripped {
    Depth,
    DuplicateKey(String),
}

/// The limits a deserialization runs under, shared by every nesting level. Records which limit
/// stopped it, since the error itself has to go through the deserializer's own error type.
pub(crate) struct Guard {
    max_depth: usize,
    duplicate_keys: DuplicateKeys,
    tripped: Cell<Option<Tripped>>,
}

impl Guard {
    pub(crate) fn new(max_depth: usize, duplicate_keys: DuplicateKeys) -> Guard {
        Guard {
            max_depth,
            duplicate_keys,
            tripped: Cell::new(None),
        }
    }

    pub(crate) fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub(crate) fn take_tripped(&self) -> Option<Tripped> {
        self.tripped.take()
    }

    fn trip<E: Error>(&self, tripped: Tripped) -> E {
        let err = match &tripped {
            Tripped::Depth => E::custom(format_args!(
                "nesting exceeds the maximum depth of {}",
                self.max_depth
            )),
            Tripped::DuplicateKey(key) => E::custom(format_args!("duplicate key `{}`", key)),
        };
        self.tripped.set(Some(tripped));
        err
    }
}

/// Deserializes a [`Value`] at a given nesting depth.
#[derive(Clone, Copy)]
pub(crate) struct ValueSeed<'g> {
    guard: &'g Guard,
    depth: usize,
}

impl<'g> ValueSeed<'g> {
    /// A seed for the top-level value.
    pub(crate) fn new(guard: &'g Guard) -> ValueSeed<'g> {
        ValueSeed { guard, depth: 0 }
    }
}

impl<'de, 'g> DeserializeSeed<'de> for ValueSeed<'g> {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor {
            guard: self.guard,
            depth: self.depth,
        })
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let guard = Guard::new(DEFAULT_MAX_DEPTH, DuplicateKeys::Reject);
        ValueSeed::new(&guard).deserialize(deserializer)
    }
}

struct ValueVisitor<'g> {
    guard: &'g Guard,
    depth: usize,
}

impl<'g> ValueVisitor<'g> {
    // Checks the depth of a container about to be entered, returns the seed for its children.
    fn enter<E: Error>(&self) -> Result<ValueSeed<'g>, E> {
        let depth = self.depth + 1;
        if depth > self.guard.max_depth {
            Err(self.guard.trip(Tripped::Depth))
        } else {
            Ok(ValueSeed {
                guard: self.guard,
                depth,
            })
        }
    }
}

impl<'de, 'g> Visitor<'de> for ValueVisitor<'g> {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any valid JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Value::Number(Number::from(v)))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Value::Number(Number::from(v)))
    }

    fn visit_f64<E: Error>(self, v: f64) -> Result<Self::Value, E> {
        match Number::from_f64(v) {
            Some(n) => Ok(Value::Number(n)),
            None => Err(E::custom("number is not finite")),
        }
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let seed = self.enter()?;
        // use the size hint, but put a maximum to the allocation because we can't trust the input
        let mut v = Vec::with_capacity(std::cmp::min(seq.size_hint().unwrap_or(0), MAX_ALLOC));

        while let Some(inner) = seq.next_element_seed(seed)? {
            v.push(inner);
        }

        Ok(Value::Array(v))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let seed = self.enter()?;
        // use the size hint, but put a maximum to the allocation because we can't trust the input
        let mut m = Map::with_capacity(std::cmp::min(map.size_hint().unwrap_or(0), MAX_ALLOC));

        while let Some(key) = map.next_key::<String>()? {
            if m.contains_key(&key) {
                match self.guard.duplicate_keys {
                    DuplicateKeys::Reject => {
                        return Err(self.guard.trip(Tripped::DuplicateKey(key)));
                    }
                    DuplicateKeys::FirstWins => {
                        // still has to be parsed (and depth checked) to get past it
                        map.next_value_seed(seed)?;
                    }
                    DuplicateKeys::LastWins => {
                        let val = map.next_value_seed(seed)?;
                        m.insert(key, val);
                    }
                }
            } else {
                let val = map.next_value_seed(seed)?;
                m.insert(key, val);
            }
        }

        Ok(Value::Object(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str, guard: &Guard) -> Result<Value, serde_json::Error> {
        let mut de = serde_json::Deserializer::from_str(input);
        ValueSeed::new(guard).deserialize(&mut de)
    }

    #[test]
    fn trips_on_depth() {
        let guard = Guard::new(2, DuplicateKeys::Reject);
        assert!(parse("[[1]]", &guard).is_ok());
        assert_eq!(guard.take_tripped(), None);

        assert!(parse("[[[1]]]", &guard).is_err());
        assert_eq!(guard.take_tripped(), Some(Tripped::Depth));
        assert_eq!(guard.take_tripped(), None);
    }

    #[test]
    fn trips_on_duplicate_key() {
        let guard = Guard::new(8, DuplicateKeys::Reject);
        assert!(parse(r#"{"a":1,"a":2}"#, &guard).is_err());
        assert_eq!(guard.take_tripped(), Some(Tripped::DuplicateKey("a".to_string())));
    }

    #[test]
    fn other_errors_do_not_trip() {
        let guard = Guard::new(8, DuplicateKeys::Reject);
        assert!(parse("[1,]", &guard).is_err());
        assert_eq!(guard.take_tripped(), None);
    }

    #[test]
    fn plain_deserialize_uses_defaults() {
        let v: Value = serde_json::from_str(r#"{"b":[true,null],"a":-1.5}"#).unwrap();
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert!(serde_json::from_str::<Value>(r#"{"a":1,"a":1}"#).is_err());
    }
}
