//! Configuration bags for the [`json`](crate::json) codec.
//!
//! All options derive serde's traits, so they can be embedded in the configuration file of the
//! application that uses the codec. Missing fields take their default value, unknown fields are
//! rejected.

use serde_derive::{Deserialize, Serialize};

/// The nesting limit used when no other limit is configured. Matches the recursion limit
/// `serde_json` applies on its own.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// The highest nesting limit the codec applies. A configured `max_depth` above it is lowered to
/// it, since both directions recurse once per level and deeper nesting could overflow the stack
/// of a thread with the default 2 MiB size.
pub const MAX_DEPTH_CEILING: usize = 512;

/// Controls how values are rendered as JSON text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeOptions {
    /// Put every array element and object entry on its own line, indented by two spaces per
    /// level. Compact output (no whitespace at all) otherwise.
    pub pretty_print: bool,
    /// Emit object entries sorted by key (byte-wise on the UTF-8 encoding) instead of in
    /// insertion order.
    pub sort_keys: bool,
    /// The maximum number of nested arrays and objects. Deeper values fail to encode. Capped at
    /// [`MAX_DEPTH_CEILING`].
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            pretty_print: false,
            sort_keys: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EncodeOptions {
    /// The nesting limit that actually applies: `max_depth`, but at most [`MAX_DEPTH_CEILING`].
    pub fn effective_max_depth(&self) -> usize {
        std::cmp::min(self.max_depth, MAX_DEPTH_CEILING)
    }

    /// Default options, but with `pretty_print` set.
    pub fn pretty() -> Self {
        EncodeOptions {
            pretty_print: true,
            ..EncodeOptions::default()
        }
    }
}

/// What to do when an object in the input contains the same key more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeys {
    /// Fail with a [`ParseErrorKind::DuplicateKey`](crate::ParseErrorKind::DuplicateKey) error.
    Reject,
    /// Keep the first entry, ignore later ones.
    FirstWins,
    /// Keep the value of the last entry, at the position of the first one.
    LastWins,
}

impl Default for DuplicateKeys {
    fn default() -> Self {
        DuplicateKeys::Reject
    }
}

/// Controls how JSON text is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeOptions {
    /// Accept a bare scalar (string, number, boolean or null) as the top-level value. When unset,
    /// only arrays and objects are accepted.
    pub allow_fragments: bool,
    /// Ignore whatever follows the first complete value. When unset, anything but whitespace
    /// after the value is an error.
    pub allow_trailing_data: bool,
    /// The maximum number of nested arrays and objects. Deeper input fails to decode. Capped at
    /// [`MAX_DEPTH_CEILING`].
    pub max_depth: usize,
    /// How to treat objects with repeated keys.
    pub duplicate_keys: DuplicateKeys,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            allow_fragments: false,
            allow_trailing_data: false,
            max_depth: DEFAULT_MAX_DEPTH,
            duplicate_keys: DuplicateKeys::Reject,
        }
    }
}

impl DecodeOptions {
    /// The nesting limit that actually applies: `max_depth`, but at most [`MAX_DEPTH_CEILING`].
    pub fn effective_max_depth(&self) -> usize {
        std::cmp::min(self.max_depth, MAX_DEPTH_CEILING)
    }

    /// Default options, but accepting top-level scalars.
    pub fn fragments() -> Self {
        DecodeOptions {
            allow_fragments: true,
            ..DecodeOptions::default()
        }
    }
}
