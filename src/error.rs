//! Error types for the smaz library.

use std::fmt;

/// Result type alias for smaz operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a codec or decoding a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The encoded stream is malformed for the codec it was handed to.
    CorruptInput {
        /// Offset of the opcode that could not be decoded.
        offset: usize,
        /// What was wrong with it.
        reason: Corruption,
    },
    /// The dictionary has more entries than there are one-byte codes.
    TableTooLarge {
        /// Number of entries supplied.
        len: usize,
        /// Maximum number of entries allowed.
        max: usize,
    },
    /// A dictionary entry is empty and could never be matched.
    EmptyEntry {
        /// Position of the entry in the table.
        index: usize,
    },
}

/// Detail for [`Error::CorruptInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corruption {
    /// A single-byte escape is the last byte of the stream.
    MissingLiteral,
    /// A run escape is not followed by its length byte.
    MissingRunLength,
    /// A run escape claims more literal bytes than remain.
    TruncatedRun {
        /// Literal bytes announced by the length byte.
        expected: usize,
        /// Literal bytes actually present.
        available: usize,
    },
    /// A dictionary code the table has no entry for.
    UnknownCode(u8),
}

impl Error {
    pub(crate) fn corrupt(offset: usize, reason: Corruption) -> Self {
        Error::CorruptInput { offset, reason }
    }

    /// Returns true if this error was raised while decoding malformed input.
    pub fn is_corrupt_input(&self) -> bool {
        matches!(self, Error::CorruptInput { .. })
    }
}

impl fmt::Display for Corruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corruption::MissingLiteral => write!(f, "verbatim byte escape has no literal"),
            Corruption::MissingRunLength => write!(f, "verbatim run escape has no length byte"),
            Corruption::TruncatedRun {
                expected,
                available,
            } => write!(
                f,
                "verbatim run needs {} bytes, only {} remain",
                expected, available
            ),
            Corruption::UnknownCode(code) => {
                write!(f, "code {} is not in the dictionary", code)
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CorruptInput { offset, reason } => {
                write!(f, "Corrupt input at offset {}: {}", offset, reason)
            }
            Error::TableTooLarge { len, max } => {
                write!(
                    f,
                    "Dictionary has {} entries, at most {} are supported",
                    len, max
                )
            }
            Error::EmptyEntry { index } => {
                write!(f, "Dictionary entry {} is empty", index)
            }
        }
    }
}

impl std::error::Error for Error {}
