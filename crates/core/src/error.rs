//! Error types for huffpack.
//!
//! Every operation returns a structured error instead of panicking. The
//! codec is deterministic, so none of these are retryable: a corrupt
//! container stays corrupt.

use thiserror::Error;

/// Top-level error type for all codec operations.
///
/// The four codec failures map directly onto what a caller can observe:
/// - `EmptyInput`: a tree was requested for an empty frequency table
/// - `SizeLimitExceeded`: the bitstream does not fit the 32-bit length field
/// - `CorruptTable`: the container or its code table cannot be trusted
/// - `TruncatedStream`: the payload ends in the middle of a code
#[derive(Debug, Error)]
pub enum Error {
    /// No symbols with non-zero frequency (cannot build a tree)
    #[error("empty input: cannot build a huffman tree without symbols")]
    EmptyInput,

    /// Encoded bitstream is longer than the container can describe
    #[error("encoded bitstream of {bits} bits exceeds the limit of {max} bits")]
    SizeLimitExceeded { bits: u64, max: u64 },

    /// Container framing or code table is malformed
    #[error("corrupt table: {0}")]
    CorruptTable(#[from] TableError),

    /// Payload ended while a code was still being matched
    #[error("truncated stream: {pending} of {bit_len} bits do not complete a code")]
    TruncatedStream { bit_len: u64, pending: usize },

    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a container or its serialized codebook was rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// Not enough bytes left for a fixed-size field
    #[error("{field} needs {required} bytes, only {actual} available")]
    TooShort {
        field: &'static str,
        required: usize,
        actual: usize,
    },

    /// Length prefix points past the end of the container
    #[error("table length {declared} exceeds the {available} remaining bytes")]
    LengthOverrun { declared: usize, available: usize },

    /// Table was written by an unknown format revision
    #[error("unsupported table version {0}")]
    UnsupportedVersion(u8),

    /// More records than there are byte values
    #[error("symbol count {0} exceeds 256")]
    TooManySymbols(usize),

    /// A record declares a zero-length code
    #[error("symbol {symbol:#04x} has an empty code")]
    EmptyCode { symbol: u8 },

    /// The same symbol appears in more than one record
    #[error("symbol {symbol:#04x} appears more than once")]
    DuplicateSymbol { symbol: u8 },

    /// One code is a prefix of (or equal to) another
    #[error("code for {shorter:#04x} is a prefix of the code for {longer:#04x}")]
    NotPrefixFree { shorter: u8, longer: u8 },

    /// Bytes left over after the last record
    #[error("{0} unexpected trailing bytes in table")]
    TrailingBytes(usize),

    /// Table checksum does not match its contents
    #[error("table checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// An empty table cannot describe a non-empty bitstream
    #[error("empty table with {0} payload bits")]
    EmptyTableWithPayload(u32),

    /// Payload holds more bytes than the bit length needs
    #[error("payload length mismatch: bit length needs {expected} bytes, got {actual}")]
    PayloadLength { expected: usize, actual: usize },

    /// Input contains a symbol the codebook has no code for
    #[error("symbol {symbol:#04x} has no code")]
    MissingSymbol { symbol: u8 },

    /// Bits accumulated past the longest code without a match
    #[error("bits at position {position} match no code")]
    UnmatchedBits { position: u64 },
}

/// Bit-level I/O errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits in one call)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),

    /// Logical bit length does not fit inside the byte buffer
    #[error("bit length {bit_len} exceeds buffer of {available} bits")]
    BitLenExceedsBuffer { bit_len: u64, available: u64 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
