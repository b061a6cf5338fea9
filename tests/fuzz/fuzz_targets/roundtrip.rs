//! Fuzz target for encode/decode round trips.
//!
//! Builds a codec from a fuzzer-chosen dictionary and checks that arbitrary
//! input survives a round trip and stays within the size bound.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

/// Structured input for round-trip fuzzing.
#[derive(Arbitrary, Debug)]
struct RoundtripInput {
    /// Dictionary entries; invalid tables are expected to be rejected.
    table: Vec<Vec<u8>>,
    /// Data to compress
    data: Vec<u8>,
}

fuzz_target!(|input: RoundtripInput| {
    // Limit input size to keep iterations fast
    if input.data.len() > 64 * 1024 {
        return;
    }

    let codec = match smaz::Codec::new(&input.table) {
        Ok(codec) => codec,
        Err(_) => {
            assert!(
                input.table.len() > smaz::MAX_TABLE_LEN
                    || input.table.iter().any(|entry| entry.is_empty())
            );
            smaz::default_codec().clone()
        }
    };

    let encoded = codec.encode(&input.data);
    assert!(encoded.len() <= smaz::max_encoded_len(input.data.len()));

    let decoded = codec.decode(&encoded).expect("encoded data must decode");
    assert_eq!(decoded, input.data, "round trip mismatch");
});
