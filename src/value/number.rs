use std::fmt;

use serde::ser::{Serialize, Serializer};

/// A JSON number: a non-negative integer, a negative integer, or a finite float.
///
/// Integers are kept exactly when they fit `u64` (non-negative) or `i64` (negative). Everything
/// else is an `f64`, which is never a NaN or an infinity. Because of that, `Number` can implement
/// `Eq`, which regular `f64` does not.
///
/// Integers and floats never compare equal to each other, so `1` and `1.0` are different numbers.
#[derive(Clone, Copy, PartialEq)]
pub struct Number(N);

#[derive(Clone, Copy, PartialEq)]
enum N {
    PosInt(u64),
    // Always less than zero.
    NegInt(i64),
    // Always finite.
    Float(f64),
}

impl Number {
    /// Safe conversion of an arbitrary `f64` into a `Number`.
    ///
    /// ```
    /// use json_value_codec::Number;
    ///
    /// assert!(Number::from_f64(0.0).is_some());
    /// assert!(Number::from_f64(-1.1).is_some());
    /// assert!(Number::from_f64(std::f64::INFINITY).is_none());
    /// assert!(Number::from_f64(std::f64::NEG_INFINITY).is_none());
    /// assert!(Number::from_f64(std::f64::NAN).is_none());
    /// ```
    pub fn from_f64(f: f64) -> Option<Number> {
        if Number::is_valid_f64(f) {
            Some(Number(N::Float(f)))
        } else {
            None
        }
    }

    /// Checks whether a given `f64` may be used as a `Number`.
    pub fn is_valid_f64(f: f64) -> bool {
        f.is_finite()
    }

    /// Whether this number is an integer that fits an `u64`.
    pub fn is_u64(&self) -> bool {
        match self.0 {
            N::PosInt(_) => true,
            _ => false,
        }
    }

    /// Whether this number is an integer that fits an `i64`.
    pub fn is_i64(&self) -> bool {
        match self.0 {
            N::PosInt(n) => n <= i64::max_value() as u64,
            N::NegInt(_) => true,
            N::Float(_) => false,
        }
    }

    /// Whether this number is stored as a float.
    pub fn is_f64(&self) -> bool {
        match self.0 {
            N::Float(_) => true,
            _ => false,
        }
    }

    /// The number as an `u64`, if it is an integer in range.
    pub fn as_u64(&self) -> Option<u64> {
        match self.0 {
            N::PosInt(n) => Some(n),
            _ => None,
        }
    }

    /// The number as an `i64`, if it is an integer in range.
    pub fn as_i64(&self) -> Option<i64> {
        match self.0 {
            N::PosInt(n) if n <= i64::max_value() as u64 => Some(n as i64),
            N::NegInt(n) => Some(n),
            _ => None,
        }
    }

    /// The number as an `f64`. Large integers may lose precision.
    pub fn as_f64(&self) -> f64 {
        match self.0 {
            N::PosInt(n) => n as f64,
            N::NegInt(n) => n as f64,
            N::Float(f) => f,
        }
    }
}

impl Eq for Number {}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number(N::PosInt(n))
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        if n < 0 {
            Number(N::NegInt(n))
        } else {
            Number(N::PosInt(n as u64))
        }
    }
}

macro_rules! from_unsigned {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::from(n as u64)
                }
            }
        )*
    };
}

macro_rules! from_signed {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::from(n as i64)
                }
            }
        )*
    };
}

from_unsigned!(u8 u16 u32 usize);
from_signed!(i8 i16 i32 isize);

impl Serialize for Number {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            N::PosInt(n) => serializer.serialize_u64(n),
            N::NegInt(n) => serializer.serialize_i64(n),
            N::Float(f) => serializer.serialize_f64(f),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self.0 {
            N::PosInt(n) => fmt::Display::fmt(&n, f),
            N::NegInt(n) => fmt::Display::fmt(&n, f),
            N::Float(x) => fmt::Debug::fmt(&x, f),
        }
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        fmt::Display::fmt(self, f)
    }
}
