use std::{io, slice};

use indexmap::map;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::ser::PrettyFormatter;

use super::super::{
    error::EncodeJsonError,
    options::EncodeOptions,
    path::{Path, PathSegment},
    value::{to_value, Value},
};

/// Serialize the given value as JSON into the IO stream.
///
/// Nothing is written if the value nests deeper than
/// [`options.effective_max_depth()`](EncodeOptions::effective_max_depth).
pub fn to_writer<W>(writer: W, value: &Value, options: &EncodeOptions) -> Result<(), EncodeJsonError>
where
    W: io::Write,
{
    check_depth(value, options.effective_max_depth())?;

    let value = Encodable {
        value,
        sort_keys: options.sort_keys,
    };
    let result = if options.pretty_print {
        let mut ser = serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(b"  "));
        value.serialize(&mut ser)
    } else {
        let mut ser = serde_json::Serializer::new(writer);
        value.serialize(&mut ser)
    };

    // `Encodable` cannot fail on its own, anything coming back is from the writer
    result.map_err(|e| EncodeJsonError::Io(e.into()))
}

/// Serialize the given value as a JSON byte vector.
pub fn encode(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, EncodeJsonError> {
    let mut writer = Vec::with_capacity(128);
    to_writer(&mut writer, value, options)?;
    Ok(writer)
}

/// Serialize arbitrary data as a JSON byte vector, by way of [`to_value`].
pub fn to_vec<T: ?Sized>(value: &T, options: &EncodeOptions) -> Result<Vec<u8>, EncodeJsonError>
where
    T: Serialize,
{
    encode(&to_value(value)?, options)
}

/// Serialize arbitrary data as a String of JSON.
pub fn to_string<T: ?Sized>(value: &T, options: &EncodeOptions) -> Result<String, EncodeJsonError>
where
    T: Serialize,
{
    let vec = to_vec(value, options)?;
    let string = unsafe {
        // serde_json does not emit invalid UTF-8.
        String::from_utf8_unchecked(vec)
    };
    Ok(string)
}

// Applies the key order of the options while serializing.
struct Encodable<'a> {
    value: &'a Value,
    sort_keys: bool,
}

impl<'a> Encodable<'a> {
    fn nested(&self, value: &'a Value) -> Encodable<'a> {
        Encodable {
            value,
            sort_keys: self.sort_keys,
        }
    }
}

impl<'a> Serialize for Encodable<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if !self.sort_keys {
            return self.value.serialize(serializer);
        }

        match self.value {
            Value::Array(v) => {
                let mut s = serializer.serialize_seq(Some(v.len()))?;
                for inner in v {
                    s.serialize_element(&self.nested(inner))?;
                }
                s.end()
            }
            Value::Object(m) => {
                let mut entries: Vec<(&String, &Value)> = m.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));

                let mut s = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    s.serialize_entry(key, &self.nested(value))?;
                }
                s.end()
            }
            scalar => scalar.serialize(serializer),
        }
    }
}

enum Children<'a> {
    Array(std::iter::Enumerate<slice::Iter<'a, Value>>),
    Object(map::Iter<'a, String, Value>),
}

impl<'a> Children<'a> {
    fn of(value: &'a Value) -> Option<Children<'a>> {
        match value {
            Value::Array(v) => Some(Children::Array(v.iter().enumerate())),
            Value::Object(m) => Some(Children::Object(m.iter())),
            _ => None,
        }
    }

    fn next(&mut self) -> Option<(PathSegment, &'a Value)> {
        match self {
            Children::Array(it) => it.next().map(|(i, v)| (PathSegment::Index(i), v)),
            Children::Object(it) => it.next().map(|(k, v)| (PathSegment::Key(k.clone()), v)),
        }
    }
}

// Walks the value without recursion, so arbitrarily deep values are rejected instead of
// overflowing the stack.
fn check_depth(value: &Value, max_depth: usize) -> Result<(), EncodeJsonError> {
    let mut frames: Vec<Children> = Vec::new();
    // path[i] is the segment of the child currently visited in frames[i]
    let mut path: Vec<PathSegment> = Vec::new();
    let mut next = Some(value);

    loop {
        if let Some(children) = next.take().and_then(Children::of) {
            if frames.len() == max_depth {
                return Err(EncodeJsonError::DepthExceeded {
                    path: Path::from(path),
                    max_depth,
                });
            }
            frames.push(children);
        }

        let depth = frames.len();
        match frames.last_mut() {
            None => return Ok(()),
            Some(children) => match children.next() {
                Some((segment, child)) => {
                    path.truncate(depth - 1);
                    path.push(segment);
                    next = Some(child);
                }
                None => {
                    frames.pop();
                }
            },
        }
    }
}
