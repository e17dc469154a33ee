//! Error types for the codec.

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Codec error types.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from an underlying file or stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value does not fit the fixed width of its header field.
    #[error("capacity exceeded: {field} is {value}, the header field holds at most {max}")]
    Capacity {
        field: &'static str,
        value: u64,
        max: u64,
    },

    /// The compressed stream is malformed.
    #[error("malformed stream: {0}")]
    Format(#[from] FormatError),

    /// The packer was fed a byte that has no codeword.
    #[error("byte 0x{0:02x} has no codeword in the dictionary")]
    UnknownSymbol(u8),

    /// The packer input ended before the declared byte count was reached.
    #[error("input ended after {actual} bytes, expected {expected}")]
    LengthMismatch { expected: u64, actual: u64 },

    /// Decompressing the written output did not reproduce the input.
    #[error("verification failed: round trip of {path} does not match the input")]
    VerifyMismatch { path: String },
}

/// Ways a compressed stream can be malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("header ended in the {state} section")]
    TruncatedHeader { state: &'static str },

    #[error("symbol 0x{0:02x} listed twice in the dictionary")]
    DuplicateSymbol(u8),

    #[error("symbol 0x{0:02x} declares a zero-length codeword")]
    ZeroLengthCodeword(u8),

    #[error("two symbols share the same codeword")]
    DuplicateCodeword,

    #[error("codeword of 0x{short:02x} is a prefix of the codeword of 0x{long:02x}")]
    NotPrefixFree { short: u8, long: u8 },

    #[error("payload ended with {remaining} bytes still to decode")]
    TruncatedPayload { remaining: u64 },

    #[error("bit sequence of length {len} matches no codeword")]
    UnmatchedCodeword { len: usize },
}

impl Error {
    /// True for errors caused by a malformed compressed stream.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }

    /// True for header field-width violations.
    pub fn is_capacity(&self) -> bool {
        matches!(self, Error::Capacity { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_converts() {
        let err: Error = FormatError::DuplicateCodeword.into();
        assert!(err.is_format());
        assert!(!err.is_capacity());
    }

    #[test]
    fn test_capacity_message() {
        let err = Error::Capacity {
            field: "byte count",
            value: 256,
            max: 255,
        };
        assert!(err.is_capacity());
        assert_eq!(
            err.to_string(),
            "capacity exceeded: byte count is 256, the header field holds at most 255"
        );
    }
}
