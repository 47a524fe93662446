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
            let compact = encode(&val, &EncodeOptions::default()).unwrap();
            let redecoded = decode(&compact[..], &options).unwrap();
            assert_eq!(val, redecoded);
        }
        Err(_) => {}
    }
});
