//! This crate implements a small JSON codec: a [`Value`] type for arbitrary JSON data, plus a
//! pair of operations that turn values into JSON text and back, reporting failures as structured
//! errors rather than panics.
//!
//! The actual reading and writing of JSON text is done by
//! [serde_json](https://crates.io/crates/serde_json). This crate adds what a client of a remote
//! JSON API needs around it:
//!
//! - an order-preserving [`Value`] whose [`Number`]s are never NaN or infinite,
//! - configurable output ([`EncodeOptions`]: pretty printing, sorted keys),
//! - configurable input ([`DecodeOptions`]: top-level fragments, trailing data, duplicate keys),
//! - a nesting limit on both sides, so hostile input fails with an error instead of overflowing
//!   the stack,
//! - errors that say where things went wrong: a byte offset into the input when decoding, a
//!   [`Path`] into the value when encoding.
//!
//! Every operation is a pure function of its arguments. There is no shared state, so everything
//! here can be used from any number of threads at once.
//!
//! ```
//! use json_value_codec::{JsonCodec, Value};
//!
//! let codec = JsonCodec::new();
//! let event = codec.decode(br#"{"name":"purchase","price":7}"#).unwrap();
//! assert_eq!(event.get("price"), Some(&Value::from(7u8)));
//! assert_eq!(codec.encode(&event).unwrap(), br#"{"name":"purchase","price":7}"#.to_vec());
//! ```
#![warn(missing_docs)]

extern crate indexmap;
extern crate serde;
extern crate serde_json;

use serde_derive::{Deserialize, Serialize};

mod error;
mod options;
mod path;
mod value;

pub use self::error::{DecodeJsonError, EncodeJsonError, ParseError, ParseErrorKind};
pub use self::options::{
    DecodeOptions, DuplicateKeys, EncodeOptions, DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING,
};
pub use self::path::{Path, PathSegment};
pub use self::value::{to_value, Map, Number, Value, ValueSerializer};

pub mod json;

/// Encodes and decodes JSON with a fixed set of options.
///
/// The codec holds no state besides its options, so a single instance can be shared freely. It
/// derives serde's traits, so it can be part of an application's configuration:
///
/// ```
/// use json_value_codec::JsonCodec;
///
/// let codec: JsonCodec = serde_json::from_str(r#"{"encode": {"sort_keys": true}}"#).unwrap();
/// assert!(codec.encode.sort_keys);
/// assert!(!codec.decode.allow_fragments);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JsonCodec {
    /// The options used by [`encode`](JsonCodec::encode).
    pub encode: EncodeOptions,
    /// The options used by [`decode`](JsonCodec::decode).
    pub decode: DecodeOptions,
}

impl JsonCodec {
    /// A codec with the default options.
    pub fn new() -> JsonCodec {
        JsonCodec::default()
    }

    /// A codec with the given options.
    pub fn with_options(encode: EncodeOptions, decode: DecodeOptions) -> JsonCodec {
        JsonCodec { encode, decode }
    }

    /// Render a value as JSON text, see [`json::encode`].
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeJsonError> {
        json::encode(value, &self.encode)
    }

    /// Parse JSON text into a value, see [`json::decode`].
    pub fn decode(&self, input: &[u8]) -> Result<Value, DecodeJsonError> {
        json::decode(input, &self.decode)
    }
}
