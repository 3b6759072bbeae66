//! Container serialization and parsing.
//!
//! A container packages the code table with the packed bitstream so a
//! decoder needs nothing else to restore the input.
//!
//! # Container Format
//!
//! ```text
//! +----------------------+
//! | table_len (4)        |  u32 big-endian
//! +----------------------+
//! | table (table_len)    |  serialized codebook, see `codebook`
//! +----------------------+
//! | bit_len (4)          |  u32 big-endian, logical payload bits
//! +----------------------+
//! | payload (variable)   |  ceil(bit_len / 8) bytes, MSB-first,
//! |                      |  zero padded
//! +----------------------+
//! ```
//!
//! The payload has no length prefix: it runs to the end of the container
//! and must be exactly as long as `bit_len` requires.

use crate::bitio::{packed_len, padding_bits, PackedBits};
use crate::codebook::Codebook;
use crate::error::{Error, Result, TableError};

/// Largest bitstream the 32-bit length field can describe.
pub const MAX_BIT_LEN: u64 = u32::MAX as u64;

const LEN_FIELD: usize = 4;

/// Check that a bitstream of `bits` bits fits the container.
///
/// # Errors
/// `Error::SizeLimitExceeded` if `bits > MAX_BIT_LEN`.
pub fn check_bit_len(bits: u64) -> Result<u32> {
    u32::try_from(bits).map_err(|_| Error::SizeLimitExceeded {
        bits,
        max: MAX_BIT_LEN,
    })
}

/// A parsed container: code table, logical bit length and packed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    /// Code table used to produce the payload
    pub codebook: Codebook,

    /// Logical payload length in bits (padding excluded)
    pub bit_len: u32,

    /// Packed payload, `ceil(bit_len / 8)` bytes
    pub payload: Vec<u8>,
}

impl Container {
    /// Wrap a codebook and its packed bitstream.
    ///
    /// # Errors
    /// `Error::SizeLimitExceeded` if the bitstream is too long for the
    /// length field.
    pub fn new(codebook: Codebook, packed: PackedBits) -> Result<Self> {
        let bit_len = check_bit_len(packed.bit_len)?;
        Ok(Self {
            codebook,
            bit_len,
            payload: packed.bytes,
        })
    }

    /// Container for empty input: empty table, no payload.
    pub fn empty() -> Self {
        Self {
            codebook: Codebook::empty(),
            bit_len: 0,
            payload: Vec::new(),
        }
    }

    /// Padding bits in the final payload byte.
    pub fn padding(&self) -> u8 {
        padding_bits(self.bit_len as u64)
    }

    /// Serialize into the wire format.
    pub fn serialize(&self) -> Vec<u8> {
        let table = self.codebook.serialize();

        let mut out = Vec::with_capacity(2 * LEN_FIELD + table.len() + self.payload.len());
        out.extend_from_slice(&(table.len() as u32).to_be_bytes());
        out.extend_from_slice(&table);
        out.extend_from_slice(&self.bit_len.to_be_bytes());
        out.extend_from_slice(&self.payload);
        out
    }

    /// Parse a container from bytes.
    ///
    /// # Errors
    /// - `Error::CorruptTable` for missing or oversized length fields, an
    ///   invalid table, an empty table with payload bits, or surplus payload
    /// - `Error::TruncatedStream` if the payload is shorter than `bit_len`
    ///   requires
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let (table_len, rest) = read_len(bytes, "table length")?;
        let table_len = table_len as usize;
        if table_len > rest.len() {
            return Err(TableError::LengthOverrun {
                declared: table_len,
                available: rest.len(),
            }
            .into());
        }
        let (table, rest) = rest.split_at(table_len);
        let codebook = Codebook::deserialize(table)?;

        let (bit_len, payload) = read_len(rest, "bit length")?;
        if codebook.is_empty() && bit_len > 0 {
            return Err(TableError::EmptyTableWithPayload(bit_len).into());
        }

        let expected = packed_len(bit_len as u64) as usize;
        if payload.len() < expected {
            return Err(Error::TruncatedStream {
                bit_len: bit_len as u64,
                pending: bit_len as usize - payload.len() * 8,
            });
        }
        if payload.len() > expected {
            return Err(TableError::PayloadLength {
                expected,
                actual: payload.len(),
            }
            .into());
        }

        Ok(Self {
            codebook,
            bit_len,
            payload: payload.to_vec(),
        })
    }
}

/// Split a big-endian u32 off the front of `bytes`.
fn read_len<'a>(bytes: &'a [u8], field: &'static str) -> Result<(u32, &'a [u8])> {
    match bytes.split_first_chunk::<LEN_FIELD>() {
        Some((len, rest)) => Ok((u32::from_be_bytes(*len), rest)),
        None => Err(TableError::TooShort {
            field,
            required: LEN_FIELD,
            actual: bytes.len(),
        }
        .into()),
    }
}
