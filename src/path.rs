// Locations inside a value graph, used to point at the part of a value that could not be encoded.

use std::fmt;

/// One step from a container to one of its children.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum PathSegment {
    /// The element at this position of an array.
    Index(usize),
    /// The entry with this key of an object.
    Key(String),
}

/// A location inside a [`Value`](crate::Value), starting at the root.
///
/// Displays as an [RFC 6901](https://tools.ietf.org/html/rfc6901) JSON Pointer, so the root is
/// the empty string and `/readings/1` is the second element of the `readings` entry.
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct Path {
    // Leaf first: errors are built from the inside out, so parents append their segment.
    reversed: Vec<PathSegment>,
}

impl Path {
    /// The path of the root value.
    pub fn root() -> Path {
        Path::default()
    }

    /// Whether this is the path of the root value.
    pub fn is_root(&self) -> bool {
        self.reversed.is_empty()
    }

    /// The segments from the root to the addressed value.
    pub fn segments(&self) -> impl DoubleEndedIterator<Item = &PathSegment> + ExactSizeIterator {
        self.reversed.iter().rev()
    }

    pub(crate) fn push_parent(&mut self, segment: PathSegment) {
        self.reversed.push(segment);
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(mut segments: Vec<PathSegment>) -> Self {
        segments.reverse();
        Path { reversed: segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for segment in self.segments() {
            f.write_str("/")?;
            match segment {
                PathSegment::Index(i) => write!(f, "{}", i)?,
                PathSegment::Key(key) => {
                    for c in key.chars() {
                        match c {
                            '~' => f.write_str("~0")?,
                            '/' => f.write_str("~1")?,
                            other => write!(f, "{}", other)?,
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
