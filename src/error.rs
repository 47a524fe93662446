use std::{error, fmt, io};

use serde::ser;

use super::path::{Path, PathSegment};

/// Everything that can go wrong while encoding.
#[derive(Debug)]
pub enum EncodeJsonError {
    /// The input contained something that has no JSON representation, e.g. a NaN or a map with
    /// non-string keys.
    UnsupportedValue {
        /// Where in the input the value was found.
        path: Path,
        /// What was wrong with it.
        reason: String,
    },
    /// The input nests arrays and objects deeper than allowed.
    DepthExceeded {
        /// The container that would exceed the limit.
        path: Path,
        /// The configured limit.
        max_depth: usize,
    },
    /// Writing the output failed.
    Io(io::Error),
}

impl EncodeJsonError {
    /// The location of the offending value, if the error concerns one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            EncodeJsonError::UnsupportedValue { path, .. } => Some(path),
            EncodeJsonError::DepthExceeded { path, .. } => Some(path),
            EncodeJsonError::Io(_) => None,
        }
    }

    // Used by containers to record which child an error came from.
    pub(crate) fn within(mut self, segment: PathSegment) -> Self {
        match &mut self {
            EncodeJsonError::UnsupportedValue { path, .. } => path.push_parent(segment),
            EncodeJsonError::DepthExceeded { path, .. } => path.push_parent(segment),
            EncodeJsonError::Io(_) => {}
        }
        self
    }
}

fn write_location(f: &mut fmt::Formatter, path: &Path) -> fmt::Result {
    if path.is_root() {
        f.write_str("at the root")
    } else {
        write!(f, "at `{}`", path)
    }
}

impl fmt::Display for EncodeJsonError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncodeJsonError::UnsupportedValue { path, reason } => {
                write!(f, "unsupported value ")?;
                write_location(f, path)?;
                write!(f, ": {}", reason)
            }
            EncodeJsonError::DepthExceeded { path, max_depth } => {
                write!(f, "nesting exceeds the maximum depth of {} ", max_depth)?;
                write_location(f, path)
            }
            EncodeJsonError::Io(err) => write!(f, "failed to write json: {}", err),
        }
    }
}

impl error::Error for EncodeJsonError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            EncodeJsonError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl ser::Error for EncodeJsonError {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        EncodeJsonError::UnsupportedValue {
            path: Path::root(),
            reason: msg.to_string(),
        }
    }
}

impl From<io::Error> for EncodeJsonError {
    fn from(err: io::Error) -> Self {
        EncodeJsonError::Io(err)
    }
}

/// The ways in which JSON text can be malformed.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ParseErrorKind {
    /// A generic syntax error: an unexpected byte, an invalid escape, invalid UTF-8, a number out
    /// of range, etc.
    Syntax,
    /// Needed more data but the input ended.
    UnexpectedEndOfInput,
    /// An object has multiple entries with equal keys.
    DuplicateKey,
    /// The top-level value is a scalar but fragments are not allowed.
    Fragment,
    /// The input contained a value followed by at least one non-whitespace byte.
    TrailingCharacters,
}

/// Malformed JSON text, with the position of the problem.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct ParseError {
    kind: ParseErrorKind,
    message: String,
    offset: usize,
}

impl ParseError {
    pub(crate) fn new<M: Into<String>>(kind: ParseErrorKind, message: M, offset: usize) -> Self {
        ParseError {
            kind,
            message: message.into(),
            offset,
        }
    }

    /// What kind of problem this is.
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// A human-readable description, without position information.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The byte offset into the input at which the problem was detected. For
    /// [`UnexpectedEndOfInput`](ParseErrorKind::UnexpectedEndOfInput) this is the input length.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.offset)
    }
}

impl error::Error for ParseError {}

/// Everything that can go wrong while decoding.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum DecodeJsonError {
    /// The input was zero bytes long.
    EmptyInput,
    /// The input is not acceptable JSON text.
    Parse(ParseError),
    /// The input nests arrays and objects deeper than allowed.
    DepthExceeded {
        /// The configured limit.
        max_depth: usize,
        /// The position just past the opening bracket of the container that exceeded the limit.
        offset: usize,
    },
}

impl DecodeJsonError {
    /// The byte offset of the problem, if the input was not empty.
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecodeJsonError::EmptyInput => None,
            DecodeJsonError::Parse(err) => Some(err.offset()),
            DecodeJsonError::DepthExceeded { offset, .. } => Some(*offset),
        }
    }

    /// The kind of syntax problem, if this is a [`Parse`](DecodeJsonError::Parse) error.
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            DecodeJsonError::Parse(err) => Some(err.kind()),
            _ => None,
        }
    }
}

impl fmt::Display for DecodeJsonError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeJsonError::EmptyInput => f.write_str("cannot decode json from empty input"),
            DecodeJsonError::Parse(err) => write!(f, "invalid json: {}", err),
            DecodeJsonError::DepthExceeded { max_depth, offset } => write!(
                f,
                "nesting exceeds the maximum depth of {} at byte {}",
                max_depth, offset
            ),
        }
    }
}

impl error::Error for DecodeJsonError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            DecodeJsonError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseError> for DecodeJsonError {
    fn from(err: ParseError) -> Self {
        DecodeJsonError::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_value_message_names_the_location() {
        let err = <EncodeJsonError as ser::Error>::custom("NaN has no json representation")
            .within(PathSegment::Index(1))
            .within(PathSegment::Key("readings".to_string()));
        assert_eq!(
            err.to_string(),
            "unsupported value at `/readings/1`: NaN has no json representation"
        );
        assert_eq!(err.path().unwrap().to_string(), "/readings/1");
    }

    #[test]
    fn io_errors_have_no_path() {
        let err = EncodeJsonError::from(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert!(err.path().is_none());
        assert!(error::Error::source(&err).is_some());
    }

    #[test]
    fn decode_error_accessors() {
        let err = DecodeJsonError::from(ParseError::new(ParseErrorKind::Syntax, "expected value", 3));
        assert_eq!(err.offset(), Some(3));
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::Syntax));
        assert_eq!(err.to_string(), "invalid json: expected value at byte 3");
        assert_eq!(DecodeJsonError::EmptyInput.offset(), None);
    }
}
