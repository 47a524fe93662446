use serde::de::DeserializeSeed;
use serde_json::error::Category;

use super::super::{
    error::{DecodeJsonError, ParseError, ParseErrorKind},
    options::DecodeOptions,
    value::{Guard, Tripped, Value, ValueSeed},
};

fn is_ws(byte: u8) -> bool {
    byte == 0x09 || byte == 0x0A || byte == 0x0D || byte == 0x20
}

// Whether the byte can begin a string, number, boolean or null.
fn starts_scalar(byte: u8) -> bool {
    match byte {
        b'"' | b'-' | b'0'..=b'9' | b't' | b'f' | b'n' => true,
        _ => false,
    }
}

/// Parse a value from the input.
///
/// Numbers decode to exact integers when they fit an `u64` or `i64`, and to the closest `f64`
/// otherwise. Object entries keep the order of the input.
pub fn decode(input: &[u8], options: &DecodeOptions) -> Result<Value, DecodeJsonError> {
    if input.is_empty() {
        return Err(DecodeJsonError::EmptyInput);
    }

    if !options.allow_fragments {
        if let Some(offset) = input.iter().position(|b| !is_ws(*b)) {
            if starts_scalar(input[offset]) {
                return Err(ParseError::new(
                    ParseErrorKind::Fragment,
                    "top-level value must be an array or an object",
                    offset,
                )
                .into());
            }
        }
    }

    let guard = Guard::new(options.effective_max_depth(), options.duplicate_keys);
    let mut de = serde_json::Deserializer::from_slice(input);
    // the guard enforces the depth limit, which may be larger than serde_json's own
    de.disable_recursion_limit();

    let value = ValueSeed::new(&guard)
        .deserialize(&mut de)
        .map_err(|e| translate(e, input, &guard))?;

    if !options.allow_trailing_data {
        de.end().map_err(|e| {
            let offset = offset_of(&e, input);
            ParseError::new(ParseErrorKind::TrailingCharacters, message_of(&e), offset)
        })?;
    }

    Ok(value)
}

/// Parse a value from the input, using the default options.
pub fn from_slice(input: &[u8]) -> Result<Value, DecodeJsonError> {
    decode(input, &DecodeOptions::default())
}

/// Parse a value from a string, using the default options.
pub fn from_str(input: &str) -> Result<Value, DecodeJsonError> {
    from_slice(input.as_bytes())
}

fn translate(err: serde_json::Error, input: &[u8], guard: &Guard) -> DecodeJsonError {
    let offset = offset_of(&err, input);
    match guard.take_tripped() {
        Some(Tripped::Depth) => DecodeJsonError::DepthExceeded {
            max_depth: guard.max_depth(),
            offset,
        },
        Some(Tripped::DuplicateKey(_)) => {
            ParseError::new(ParseErrorKind::DuplicateKey, message_of(&err), offset).into()
        }
        None => {
            let kind = match err.classify() {
                Category::Eof => ParseErrorKind::UnexpectedEndOfInput,
                _ => ParseErrorKind::Syntax,
            };
            ParseError::new(kind, message_of(&err), offset).into()
        }
    }
}

// serde_json reports a 1-based line and a column that points one past the offending byte.
fn offset_of(err: &serde_json::Error, input: &[u8]) -> usize {
    if err.classify() == Category::Eof {
        return input.len();
    }
    if err.line() == 0 {
        return 0;
    }

    let line_start = if err.line() == 1 {
        0
    } else {
        input
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == b'\n')
            .nth(err.line() - 2)
            .map(|(i, _)| i + 1)
            .unwrap_or(input.len())
    };

    std::cmp::min((line_start + err.column()).saturating_sub(1), input.len())
}

// The message without serde_json's " at line L column C" suffix.
fn message_of(err: &serde_json::Error) -> String {
    let full = err.to_string();
    let suffix = format!(" at line {} column {}", err.line(), err.column());
    match full.strip_suffix(suffix.as_str()) {
        Some(message) => message.to_string(),
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DuplicateKeys;

    fn keys(v: &Value) -> Vec<&str> {
        v.as_object().unwrap().keys().map(String::as_str).collect()
    }

    fn nesting(depth: usize) -> String {
        let mut s = "[".repeat(depth);
        s.push_str(&"]".repeat(depth));
        s
    }

    #[test]
    fn empty_input() {
        assert_eq!(from_slice(b""), Err(DecodeJsonError::EmptyInput));
    }

    #[test]
    fn unterminated_object() {
        let err = from_str("{").unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::UnexpectedEndOfInput));
        assert_eq!(err.offset(), Some(1));
    }

    #[test]
    fn syntax_error_offsets() {
        let err = from_str("[1,x]").unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::Syntax));
        assert_eq!(err.offset(), Some(3));

        let err = from_str("[1,\n x]").unwrap_err();
        assert_eq!(err.offset(), Some(5));
    }

    #[test]
    fn messages_have_no_line_and_column() {
        match from_str("[1,x]") {
            Err(DecodeJsonError::Parse(err)) => {
                assert_eq!(err.message(), "expected value");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn whitespace_only_is_not_empty() {
        let err = from_str("  \n").unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::UnexpectedEndOfInput));
        assert_eq!(err.offset(), Some(3));
    }

    #[test]
    fn fragments() {
        let err = decode(b"42", &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::Fragment));
        assert_eq!(err.offset(), Some(0));

        let err = from_str("  \"hi\"").unwrap_err();
        assert_eq!(err.offset(), Some(2));

        assert_eq!(decode(b"42", &DecodeOptions::fragments()), Ok(Value::from(42u8)));
        assert_eq!(decode(b" null ", &DecodeOptions::fragments()), Ok(Value::Null));
    }

    #[test]
    fn non_scalar_garbage_is_a_syntax_error() {
        let err = from_str("x").unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::Syntax));
    }

    #[test]
    fn trailing_data() {
        let err = from_str("[1] x").unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::TrailingCharacters));
        assert_eq!(err.offset(), Some(4));

        assert!(from_str("[1] \n").is_ok());

        let options = DecodeOptions {
            allow_trailing_data: true,
            ..DecodeOptions::default()
        };
        assert_eq!(
            decode(b"[1] x", &options),
            Ok(Value::from(vec![Value::from(1u8)]))
        );
    }

    #[test]
    fn depth_guard() {
        assert!(from_str(&nesting(128)).is_ok());

        match from_str(&nesting(129)) {
            Err(DecodeJsonError::DepthExceeded { max_depth, offset }) => {
                assert_eq!(max_depth, 128);
                // just past the opening bracket of the 129th array
                assert_eq!(offset, 129);
            }
            other => panic!("unexpected {:?}", other),
        }

        let options = DecodeOptions {
            max_depth: 2,
            ..DecodeOptions::default()
        };
        assert!(decode(br#"{"a":[1]}"#, &options).is_ok());
        match decode(br#"{"a":[{}]}"#, &options) {
            Err(DecodeJsonError::DepthExceeded { max_depth, offset }) => {
                assert_eq!(max_depth, 2);
                assert_eq!(offset, 7);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn pathological_nesting_fails_cleanly() {
        let err = from_str(&"[".repeat(1_000_000)).unwrap_err();
        match err {
            DecodeJsonError::DepthExceeded { .. } => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn configured_depth_is_capped() {
        let options = DecodeOptions {
            max_depth: 1_000_000,
            ..DecodeOptions::default()
        };
        assert!(decode(nesting(crate::MAX_DEPTH_CEILING).as_bytes(), &options).is_ok());

        let err = decode("[".repeat(200_000).as_bytes(), &options).unwrap_err();
        assert_eq!(
            err,
            DecodeJsonError::DepthExceeded {
                max_depth: crate::MAX_DEPTH_CEILING,
                offset: crate::MAX_DEPTH_CEILING + 1,
            }
        );
    }

    #[test]
    fn larger_depth_limits_than_serde_json() {
        let options = DecodeOptions {
            max_depth: 200,
            ..DecodeOptions::default()
        };
        assert!(decode(nesting(150).as_bytes(), &options).is_ok());
    }

    #[test]
    fn duplicate_keys() {
        let input = br#"{"a":1,"b":2,"a":3}"#;

        let err = from_slice(input).unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::DuplicateKey));
        // just past the repeated key
        assert_eq!(err.offset(), Some(16));

        let first = DecodeOptions {
            duplicate_keys: DuplicateKeys::FirstWins,
            ..DecodeOptions::default()
        };
        let v = decode(input, &first).unwrap();
        assert_eq!(keys(&v), vec!["a", "b"]);
        assert_eq!(v.get("a"), Some(&Value::from(1u8)));

        let last = DecodeOptions {
            duplicate_keys: DuplicateKeys::LastWins,
            ..DecodeOptions::default()
        };
        let v = decode(input, &last).unwrap();
        assert_eq!(keys(&v), vec!["a", "b"]);
        assert_eq!(v.get("a"), Some(&Value::from(3u8)));
    }

    #[test]
    fn preserves_key_order() {
        let v = from_str(r#"{"z":0,"a":0,"m":{"2":0,"1":0}}"#).unwrap();
        assert_eq!(keys(&v), vec!["z", "a", "m"]);
        assert_eq!(keys(v.get("m").unwrap()), vec!["2", "1"]);
    }

    #[test]
    fn numbers() {
        let v = from_str("[0, -0, 7, -7, 18446744073709551615, 18446744073709551616, 1.5, 1e2, -9223372036854775808]").unwrap();
        let v = v.as_array().unwrap();
        assert_eq!(v[0], Value::from(0u8));
        assert_eq!(v[1].as_number().unwrap().as_f64(), 0.0);
        assert_eq!(v[2], Value::from(7u8));
        assert_eq!(v[3], Value::from(-7i8));
        assert_eq!(v[4], Value::from(u64::max_value()));
        assert!(v[5].as_number().unwrap().is_f64());
        assert_eq!(v[6].as_number().unwrap().as_f64(), 1.5);
        assert!(v[7].as_number().unwrap().is_f64());
        assert_eq!(v[8], Value::from(i64::min_value()));
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        let err = from_str("[1e400]").unwrap_err();
        assert_eq!(err.parse_kind(), Some(ParseErrorKind::Syntax));
    }

    #[test]
    fn strings() {
        let v = from_str(r#"["\u00e9\ud83d\ude00\n\/", "plain"]"#).unwrap();
        assert_eq!(v.as_array().unwrap()[0].as_str(), Some("\u{e9}\u{1F600}\n/"));

        assert!(from_str(r#"["\x"]"#).is_err());
        assert!(from_str("[\"unterminated]").is_err());
        assert!(from_slice(b"[\"\xff\"]").is_err());
        assert!(from_str("[\"raw\u{1}control\"]").is_err());
    }
}
