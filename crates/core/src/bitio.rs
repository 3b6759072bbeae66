//! Bit-level packing and unpacking.
//!
//! `BitWriter` and `BitReader` move bits in and out of byte buffers in
//! MSB-first order. The free functions [`pack_bits`] and [`unpack_bits`] are
//! the whole-buffer form used by the container: the packed buffer carries
//! its logical length alongside so padding never has to be guessed.
//!
//! # Padding Rules
//! - `BitWriter`: pads the final partial byte with trailing zeros
//! - `BitReader::with_bit_len`: stops at the logical length and never
//!   returns padding bits
//!
//! # Example
//! ```
//! use huffpack_core::bitio::{BitWriter, BitReader};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();  // Write 3 bits: 1, 0, 1
//! writer.write_bits(0b11, 2).unwrap();   // Write 2 bits: 1, 1
//! // Total: 10111 -> padded to 10111000
//!
//! let (bytes, bit_len) = writer.finish_with_len();
//! assert_eq!(bytes, vec![0b10111000]);
//!
//! let mut reader = BitReader::with_bit_len(&bytes, bit_len).unwrap();
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(2).unwrap(), 0b11);
//! assert!(reader.is_empty());
//! ```

use crate::codebook::Code;
use crate::error::{BitIoError, Result};

/// Number of zero bits needed to round `bit_len` up to a whole byte.
pub fn padding_bits(bit_len: u64) -> u8 {
    ((8 - bit_len % 8) % 8) as u8
}

/// Number of bytes needed to hold `bit_len` bits.
pub fn packed_len(bit_len: u64) -> u64 {
    bit_len.div_ceil(8)
}

/// A byte buffer together with the number of meaningful bits in it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackedBits {
    /// Packed bytes, MSB-first, zero padded
    pub bytes: Vec<u8>,
    /// Logical bit count before padding
    pub bit_len: u64,
}

impl PackedBits {
    /// Padding bits at the end of the final byte.
    pub fn padding(&self) -> u8 {
        padding_bits(self.bit_len)
    }
}

/// Pack a bit sequence into bytes, MSB-first, padding the tail with zeros.
pub fn pack_bits(bits: &[bool]) -> PackedBits {
    let mut writer = BitWriter::with_capacity(bits.len().div_ceil(8));
    for &bit in bits {
        writer.write_bit(bit);
    }
    let (bytes, bit_len) = writer.finish_with_len();
    PackedBits { bytes, bit_len }
}

/// Expand `bytes` MSB-first and keep exactly `bit_len` bits.
///
/// # Errors
/// `BitIoError::BitLenExceedsBuffer` if `bytes` holds fewer than `bit_len` bits.
pub fn unpack_bits(bytes: &[u8], bit_len: u64) -> Result<Vec<bool>> {
    let mut reader = BitReader::with_bit_len(bytes, bit_len)?;
    let mut bits = Vec::with_capacity(bit_len as usize);
    while !reader.is_empty() {
        bits.push(reader.read_bit()?);
    }
    Ok(bits)
}

/// Writes bits MSB-first into a byte buffer.
///
/// Accumulates bits in a buffer and flushes complete bytes to the output.
/// When finished, pads the final partial byte with zeros.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    /// Create a new BitWriter with empty output.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a BitWriter that reserves room for `bytes` output bytes.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Append a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.bit_buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Write up to 64 bits to the output.
    ///
    /// Bits are written MSB-first. For example, writing value=0b101 with count=3
    /// writes bits 1, 0, 1 in that order.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut remaining = count;
        while remaining > 0 {
            // Room left in the current byte
            let take = remaining.min(8 - self.bit_count as usize);
            let shift = remaining - take;
            let bits = ((value >> shift) & ((1u64 << take) - 1)) as u8;

            self.bit_buffer |= bits << (8 - self.bit_count as usize - take);
            self.bit_count += take as u8;

            if self.bit_count == 8 {
                self.bytes.push(self.bit_buffer);
                self.bit_buffer = 0;
                self.bit_count = 0;
            }

            remaining -= take;
        }

        Ok(())
    }

    /// Append every bit of a prefix code.
    pub fn write_code(&mut self, code: &Code) -> Result<()> {
        for (value, count) in code.chunks() {
            self.write_bits(value, count)?;
        }
        Ok(())
    }

    /// Finish writing and return the output bytes.
    ///
    /// Any remaining bits are padded with trailing zeros to complete the
    /// final byte. This consumes the writer.
    pub fn finish(self) -> Vec<u8> {
        self.finish_with_len().0
    }

    /// Finish writing and return the output bytes with the logical bit count.
    pub fn finish_with_len(mut self) -> (Vec<u8>, u64) {
        let bit_len = self.bit_len();
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        (self.bytes, bit_len)
    }

    /// Return the number of complete bytes written so far.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Return the total number of bits written (including partial byte).
    pub fn bit_len(&self) -> u64 {
        self.bytes.len() as u64 * 8 + self.bit_count as u64
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits MSB-first from a byte buffer.
///
/// A reader built with [`BitReader::new`] exposes every bit of the buffer,
/// padding included. [`BitReader::with_bit_len`] stops at the logical end.
///
/// # Invariants
/// - `bit_position <= bit_limit <= data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Source data
    data: &'a [u8],
    /// Current bit position (0 = MSB of first byte)
    bit_position: u64,
    /// One past the last readable bit
    bit_limit: u64,
}

impl<'a> BitReader<'a> {
    /// Create a new BitReader over every bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_position: 0,
            bit_limit: data.len() as u64 * 8,
        }
    }

    /// Create a BitReader that yields only the first `bit_len` bits of `data`.
    ///
    /// # Errors
    /// `BitIoError::BitLenExceedsBuffer` if `data` is too short.
    pub fn with_bit_len(data: &'a [u8], bit_len: u64) -> Result<Self> {
        let available = data.len() as u64 * 8;
        if bit_len > available {
            return Err(BitIoError::BitLenExceedsBuffer { bit_len, available }.into());
        }
        Ok(Self {
            data,
            bit_position: 0,
            bit_limit: bit_len,
        })
    }

    /// Read up to 64 bits from the input.
    ///
    /// Bits are read MSB-first. For example, reading 3 bits from byte 0b10110000
    /// returns 0b101.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if not enough bits remain
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count as u64 > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let mut result = 0u64;
        let mut remaining = count;

        while remaining > 0 {
            let byte_idx = (self.bit_position / 8) as usize;
            let bit_offset = (self.bit_position % 8) as usize;

            let bits_in_byte = 8 - bit_offset;
            let take = remaining.min(bits_in_byte);

            let byte = self.data[byte_idx];
            let mask = ((1u16 << take) - 1) as u8;
            let bits = (byte >> (bits_in_byte - take)) & mask;

            result = (result << take) | bits as u64;

            self.bit_position += take as u64;
            remaining -= take;
        }

        Ok(result)
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bit_position >= self.bit_limit {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let byte = self.data[(self.bit_position / 8) as usize];
        let bit = byte & (0x80 >> (self.bit_position % 8)) != 0;
        self.bit_position += 1;
        Ok(bit)
    }

    /// Return the number of readable bits left.
    pub fn bits_remaining(&self) -> u64 {
        self.bit_limit - self.bit_position
    }

    /// Return the current bit position.
    pub fn position(&self) -> u64 {
        self.bit_position
    }

    /// Check if every readable bit has been consumed.
    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.bit_limit
    }
}
