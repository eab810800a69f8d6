//! Core domain errors.

use thiserror::Error;

/// Errors produced by the cartridge codec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartridgeError {
    /// Payload does not fit the two-byte size field.
    #[error("Payload of {len} bytes exceeds the 65535-byte cartridge limit")]
    PayloadTooLarge { len: usize },

    /// Input is shorter than a chunk header.
    #[error("Cartridge header truncated: got {len} bytes, need 4")]
    HeaderTooShort { len: usize },

    /// Chunk type is not a code chunk.
    #[error("Unexpected chunk type {0}, expected 5 (code)")]
    UnexpectedChunkType(u8),

    /// Code chunk addressed to a bank other than the code bank.
    #[error("Unexpected bank {0}, expected 0")]
    UnexpectedBank(u8),

    /// Reserved header byte is not zero.
    #[error("Reserved header byte is {0:#04x}, expected 0")]
    NonZeroReserved(u8),

    /// Declared payload size disagrees with the bytes present.
    #[error("Declared payload size {declared} does not match actual size {actual}")]
    SizeMismatch { declared: usize, actual: usize },

    /// Payload is not valid UTF-8.
    #[error("Cartridge payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}
