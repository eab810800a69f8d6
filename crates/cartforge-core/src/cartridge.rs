//! Binary cartridge codec.
//!
//! A cartridge is a single code chunk: a 4-byte header followed by the raw
//! UTF-8 source.
//!
//! ```text
//! byte 0   BBBCCCCC   bank (3 bits) | chunk type (5 bits)
//! byte 1   size low byte
//! byte 2   size high byte
//! byte 3   reserved, always 0
//! ```
//!
//! The size field is two bytes wide, so payloads above 65535 bytes are
//! rejected instead of wrapping.

use crate::error::CartridgeError;

/// Chunk type of a code chunk.
pub const CODE_CHUNK_TYPE: u8 = 5;

/// Memory bank code is written to.
pub const CODE_BANK: u8 = 0;

/// Length of a chunk header in bytes.
pub const HEADER_LEN: usize = 4;

/// Largest payload the size field can describe.
pub const MAX_PAYLOAD_LEN: usize = u16::MAX as usize;

/// Decoded chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Chunk type (low five bits of byte 0).
    pub chunk_type: u8,
    /// Bank number (high three bits of byte 0).
    pub bank: u8,
    /// Payload length in bytes.
    pub size: u16,
}

impl ChunkHeader {
    /// Header for a code chunk of `size` bytes in the default bank.
    pub fn code(size: u16) -> Self {
        Self {
            chunk_type: CODE_CHUNK_TYPE,
            bank: CODE_BANK,
            size,
        }
    }

    /// Serialize the header.
    pub fn to_bytes(self) -> [u8; HEADER_LEN] {
        let [low, high] = self.size.to_le_bytes();
        [(self.bank << 5) | (self.chunk_type & 0x1F), low, high, 0]
    }

    /// Parse a header from the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<Self, CartridgeError> {
        let Some(header) = bytes.get(..HEADER_LEN) else {
            return Err(CartridgeError::HeaderTooShort { len: bytes.len() });
        };
        Ok(Self {
            chunk_type: header[0] & 0x1F,
            bank: header[0] >> 5,
            size: u16::from_le_bytes([header[1], header[2]]),
        })
    }
}

/// A decoded cartridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cartridge {
    pub header: ChunkHeader,
    pub code: String,
}

/// Encode source text into cartridge bytes.
pub fn encode(text: &str) -> Result<Vec<u8>, CartridgeError> {
    let payload = text.as_bytes();
    let size = u16::try_from(payload.len())
        .map_err(|_| CartridgeError::PayloadTooLarge { len: payload.len() })?;

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&ChunkHeader::code(size).to_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

/// Decode cartridge bytes produced by [`encode`].
///
/// Only a single code chunk in the code bank with a zero reserved byte is
/// accepted.
pub fn decode(bytes: &[u8]) -> Result<Cartridge, CartridgeError> {
    let header = ChunkHeader::parse(bytes)?;
    if header.chunk_type != CODE_CHUNK_TYPE {
        return Err(CartridgeError::UnexpectedChunkType(header.chunk_type));
    }
    if header.bank != CODE_BANK {
        return Err(CartridgeError::UnexpectedBank(header.bank));
    }
    let reserved = bytes[HEADER_LEN - 1];
    if reserved != 0 {
        return Err(CartridgeError::NonZeroReserved(reserved));
    }

    let payload = &bytes[HEADER_LEN..];
    if payload.len() != usize::from(header.size) {
        return Err(CartridgeError::SizeMismatch {
            declared: usize::from(header.size),
            actual: payload.len(),
        });
    }

    let code = std::str::from_utf8(payload)?.to_owned();
    Ok(Cartridge { header, code })
}
