#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate json_value_codec;

use json_value_codec::{
    json::{decode, encode},
    DecodeOptions, EncodeOptions,
};

fuzz_target!(|data: &[u8]| {
    // This comment keeps rustfmt from breaking the fuzz macro...
    let options = DecodeOptions::fragments();
    match decode(data, &options) {
        Ok(val) => {
            let pretty = EncodeOptions {
                pretty_print: true,
                sort_keys: true,
                ..EncodeOptions::default()
            };
            let encoded = encode(&val, &pretty).unwrap();
            let redecoded = decode(&encoded[..], &options).unwrap();
            // sorting changes the order of entries, so compare the sorted encodings
            assert_eq!(encoded, encode(&redecoded, &pretty).unwrap());
        }
        Err(_) => {}
    }
});
