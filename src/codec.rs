//! Dictionary codec: greedy longest-match encoding against a fixed table.
//!
//! An encoded stream is a sequence of opcodes, each one byte:
//!
//! | Opcode  | Meaning                | Followed by                     |
//! |---------|------------------------|---------------------------------|
//! | 0-253   | dictionary entry       | nothing                         |
//! | 254     | one verbatim byte      | the byte                        |
//! | 255     | run of verbatim bytes  | length `N`, then `N` bytes      |
//!
//! The encoder walks the dictionary trie at every input position and takes
//! the longest entry that matches. Bytes with no match are collected into a
//! pending run and flushed with the escape opcodes just before the next
//! dictionary code (or at the end of input). See
//! [`crate::guides::wire_format`] for a worked example.

use crate::error::{Corruption, Error, Result};
use crate::trie::Trie;
use tracing::debug;

/// Opcode for a single verbatim byte.
pub const VERBATIM_BYTE: u8 = 254;

/// Opcode for a verbatim run, followed by a one-byte length.
pub const VERBATIM_RUN: u8 = 255;

/// Maximum number of dictionary entries; codes 254 and 255 are escapes.
pub const MAX_TABLE_LEN: usize = VERBATIM_BYTE as usize;

/// Longest run a single [`VERBATIM_RUN`] block can carry.
pub const MAX_RUN_LEN: usize = u8::MAX as usize;

/// Upper bound on the encoded size of `len` input bytes.
///
/// The worst case is a single unmatched byte between every pair of
/// dictionary hits, which costs two output bytes per input byte.
#[inline]
pub fn max_encoded_len(len: usize) -> usize {
    len.saturating_mul(2)
}

/// A compressor/decompressor bound to one dictionary.
///
/// Built once from a table of byte strings and immutable afterwards, so a
/// single `Codec` can be shared freely between threads.
///
/// ```rust
/// use smaz::Codec;
///
/// let codec = Codec::new(["http://", "is", ".com"]).unwrap();
/// let encoded = codec.encode(b"http://google.com");
/// assert_eq!(encoded, b"\x00\xff\x06google\x02");
/// assert_eq!(codec.decode(&encoded).unwrap(), b"http://google.com");
/// ```
#[derive(Clone)]
pub struct Codec {
    /// Entry bytes, indexed by code.
    entries: Vec<Box<[u8]>>,
    /// Maps entry bytes to their code.
    trie: Trie,
}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("entries", &self.entries.len())
            .field("trie", &self.trie)
            .finish()
    }
}

impl Codec {
    /// Build a codec from an ordered dictionary.
    ///
    /// Entry `i` is assigned code `i`. Entries need not be sorted. If the same
    /// bytes appear more than once, the encoder uses the last code, and every
    /// code still decodes.
    ///
    /// # Errors
    ///
    /// - [`Error::TableTooLarge`] if there are more than [`MAX_TABLE_LEN`] entries.
    /// - [`Error::EmptyEntry`] if an entry has no bytes.
    pub fn new<I, S>(table: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let entries: Vec<Box<[u8]>> = table
            .into_iter()
            .map(|entry| Box::from(entry.as_ref()))
            .collect();

        if entries.len() > MAX_TABLE_LEN {
            return Err(Error::TableTooLarge {
                len: entries.len(),
                max: MAX_TABLE_LEN,
            });
        }
        if let Some(index) = entries.iter().position(|entry| entry.is_empty()) {
            return Err(Error::EmptyEntry { index });
        }

        Ok(Self::from_entries(entries))
    }

    /// Build from entries that are already known to be valid.
    pub(crate) fn from_entries(entries: Vec<Box<[u8]>>) -> Self {
        debug_assert!(entries.len() <= MAX_TABLE_LEN);

        let mut trie = Trie::new();
        for (code, entry) in entries.iter().enumerate() {
            if let Some(previous) = trie.get(entry) {
                debug!(
                    code,
                    previous,
                    entry = %String::from_utf8_lossy(entry),
                    "duplicate dictionary entry replaces earlier code"
                );
            }
            trie.put(entry, code);
        }

        debug!(
            entries = entries.len(),
            nodes = trie.node_count(),
            "built dictionary trie"
        );

        Codec { entries, trie }
    }

    /// Number of dictionary entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bytes of the entry with the given code.
    pub fn entry(&self, code: u8) -> Option<&[u8]> {
        self.entries.get(code as usize).map(|entry| &entry[..])
    }

    /// All entries in code order.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        self.entries.iter().map(|entry| &entry[..])
    }

    /// The trie used for encoding.
    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Encode `src` into a new buffer.
    pub fn encode(&self, src: &[u8]) -> Vec<u8> {
        let mut dst = Vec::new();
        self.encode_into(&mut dst, src);
        dst
    }

    /// Encode `src` into a caller-provided buffer.
    ///
    /// `dst` is cleared first; only its capacity is reused.
    pub fn encode_into(&self, dst: &mut Vec<u8>, src: &[u8]) {
        dst.clear();
        dst.reserve(src.len());

        // Start of the bytes seen since the last dictionary hit.
        let mut pending = 0;
        let mut pos = 0;
        while pos < src.len() {
            match self.trie.longest_match(&src[pos..]) {
                Some((len, code)) => {
                    push_verbatim(dst, &src[pending..pos]);
                    dst.push(code as u8);
                    pos += len;
                    pending = pos;
                }
                None => pos += 1,
            }
        }
        push_verbatim(dst, &src[pending..]);
    }

    /// Decode `src` into a new buffer.
    ///
    /// # Errors
    ///
    /// [`Error::CorruptInput`] if `src` is truncated or references a code the
    /// dictionary does not have.
    pub fn decode(&self, src: &[u8]) -> Result<Vec<u8>> {
        let mut dst = Vec::new();
        self.decode_into(&mut dst, src)?;
        Ok(dst)
    }

    /// Decode `src` into a caller-provided buffer.
    ///
    /// `dst` is cleared first. On error it holds whatever was decoded before
    /// the bad opcode.
    pub fn decode_into(&self, dst: &mut Vec<u8>, src: &[u8]) -> Result<()> {
        dst.clear();
        dst.reserve(src.len());

        let mut pos = 0;
        while let Some(&opcode) = src.get(pos) {
            match opcode {
                VERBATIM_BYTE => {
                    let &byte = src
                        .get(pos + 1)
                        .ok_or_else(|| Error::corrupt(pos, Corruption::MissingLiteral))?;
                    dst.push(byte);
                    pos += 2;
                }
                VERBATIM_RUN => {
                    let len = *src
                        .get(pos + 1)
                        .ok_or_else(|| Error::corrupt(pos, Corruption::MissingRunLength))?
                        as usize;
                    let start = pos + 2;
                    let run = src.get(start..start + len).ok_or_else(|| {
                        Error::corrupt(
                            pos,
                            Corruption::TruncatedRun {
                                expected: len,
                                available: src.len() - start,
                            },
                        )
                    })?;
                    dst.extend_from_slice(run);
                    pos = start + len;
                }
                code => {
                    let entry = self
                        .entry(code)
                        .ok_or_else(|| Error::corrupt(pos, Corruption::UnknownCode(code)))?;
                    dst.extend_from_slice(entry);
                    pos += 1;
                }
            }
        }
        Ok(())
    }
}

/// Append `run` as escaped verbatim blocks of at most [`MAX_RUN_LEN`] bytes.
fn push_verbatim(dst: &mut Vec<u8>, run: &[u8]) {
    for chunk in run.chunks(MAX_RUN_LEN) {
        match chunk {
            [byte] => dst.extend_from_slice(&[VERBATIM_BYTE, *byte]),
            _ => {
                dst.push(VERBATIM_RUN);
                dst.push(chunk.len() as u8);
                dst.extend_from_slice(chunk);
            }
        }
    }
}
