//! # smaz
//!
//! Compression for short strings such as URLs, identifiers and chat
//! messages, where general-purpose compressors cannot amortise their headers.
//!
//! A fixed dictionary of up to 254 common substrings is mapped onto one-byte
//! codes. Encoding walks a prefix trie to substitute the longest dictionary
//! entry at each position; bytes with no match are escaped verbatim.
//!
//! ## Features
//!
//! - **No per-message header**: a single dictionary hit compresses to one byte
//! - **Custom dictionaries**: build a [`Codec`] from any table of byte strings
//! - **Buffer reuse** through [`Codec::encode_into`] and [`Codec::decode_into`]
//! - Optional `smaz` command-line tool via the `cli` feature
//!
//! ## Example
//!
//! ```rust
//! let encoded = smaz::encode(b"the end");
//! assert!(encoded.len() < 7);
//! assert_eq!(smaz::decode(&encoded).unwrap(), b"the end");
//!
//! // A domain-specific dictionary.
//! let codec = smaz::Codec::new(["http://", "https://", ".com", ".org"]).unwrap();
//! let encoded = codec.encode(b"https://rust-lang.org");
//! assert_eq!(codec.decode(&encoded).unwrap(), b"https://rust-lang.org");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod table;
pub mod trie;

pub use codec::{max_encoded_len, Codec, MAX_RUN_LEN, MAX_TABLE_LEN, VERBATIM_BYTE, VERBATIM_RUN};
pub use error::{Corruption, Error, Result};
pub use table::DEFAULT_TABLE;
pub use trie::{NodeId, Trie};

use std::sync::OnceLock;

/// Long-form documentation.
pub mod guides {
    #[doc = include_str!(concat!(env!("OUT_DIR"), "/docs/wire-format.md"))]
    pub mod wire_format {}

    #[doc = include_str!(concat!(env!("OUT_DIR"), "/docs/prefix-trie.md"))]
    pub mod prefix_trie {}
}

/// The codec for [`DEFAULT_TABLE`], built on first use and shared afterwards.
pub fn default_codec() -> &'static Codec {
    static DEFAULT: OnceLock<Codec> = OnceLock::new();
    DEFAULT.get_or_init(|| {
        Codec::from_entries(
            DEFAULT_TABLE
                .iter()
                .map(|entry| Box::from(entry.as_bytes()))
                .collect(),
        )
    })
}

/// Encode `src` with the default dictionary.
pub fn encode(src: &[u8]) -> Vec<u8> {
    default_codec().encode(src)
}

/// Decode `src` with the default dictionary.
pub fn decode(src: &[u8]) -> Result<Vec<u8>> {
    default_codec().decode(src)
}
