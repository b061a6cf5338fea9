//! Fuzz target for decoding untrusted streams.
//!
//! Decoding arbitrary bytes must either succeed or report corrupt input,
//! never panic. A successful decode must re-encode to something that
//! decodes to the same bytes.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let codec = smaz::default_codec();
    match codec.decode(data) {
        Ok(decoded) => {
            let reencoded = codec.encode(&decoded);
            assert_eq!(codec.decode(&reencoded).unwrap(), decoded);
        }
        Err(err) => assert!(err.is_corrupt_input()),
    }
});
