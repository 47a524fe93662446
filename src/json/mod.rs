//! The JSON encoding of [`Value`](crate::Value)s, backed by `serde_json`.

mod de;
mod ser;

pub use self::de::{decode, from_slice, from_str};
pub use self::ser::{encode, to_string, to_vec, to_writer};

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{DecodeOptions, EncodeOptions, Number, Value};

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<u64>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            any::<f64>().prop_filter_map("non-finite", |f| Number::from_f64(f).map(Value::Number)),
            ".*".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
                prop::collection::vec((".*", inner), 0..8)
                    .prop_map(|entries| entries.into_iter().collect::<Value>()),
            ]
        })
    }

    fn sorted_everywhere(v: &Value) -> bool {
        match v {
            Value::Array(items) => items.iter().all(sorted_everywhere),
            Value::Object(m) => {
                let keys: Vec<&String> = m.keys().collect();
                keys.windows(2).all(|w| w[0] < w[1]) && m.values().all(sorted_everywhere)
            }
            _ => true,
        }
    }

    proptest! {
        #[test]
        fn round_trip_containers(items in prop::collection::vec(arb_value(), 0..4)) {
            let v = Value::Array(items);
            let encoded = encode(&v, &EncodeOptions::default()).unwrap();
            prop_assert_eq!(decode(&encoded, &DecodeOptions::default()).unwrap(), v);
        }

        #[test]
        fn round_trip_any_value(v in arb_value(), pretty in any::<bool>()) {
            let options = EncodeOptions { pretty_print: pretty, ..EncodeOptions::default() };
            let encoded = encode(&v, &options).unwrap();
            prop_assert_eq!(decode(&encoded, &DecodeOptions::fragments()).unwrap(), v);
        }

        #[test]
        fn encoding_is_idempotent(v in arb_value(), sort_keys in any::<bool>()) {
            let options = EncodeOptions { sort_keys, ..EncodeOptions::default() };
            prop_assert_eq!(encode(&v, &options).unwrap(), encode(&v, &options).unwrap());
        }

        #[test]
        fn sort_keys_orders_every_object(v in arb_value()) {
            let options = EncodeOptions { sort_keys: true, ..EncodeOptions::default() };
            let encoded = encode(&v, &options).unwrap();
            let decoded = decode(&encoded, &DecodeOptions::fragments()).unwrap();
            prop_assert!(sorted_everywhere(&decoded));
        }
    }
}
