//! Prefix codes derived from a Huffman tree.
//!
//! A [`Codebook`] maps each symbol to a [`Code`]: the sequence of left (`0`)
//! and right (`1`) edges from the root to the symbol's leaf. The
//! [`ReverseCodebook`] is its inverse and is only built for decoding.
//!
//! # Table Format
//!
//! ```text
//! +---------------------+
//! | version (1)         |  currently 1
//! +---------------------+
//! | symbol count (2)    |  u16 big-endian, 0..=256
//! +---------------------+
//! | records (variable)  |  ascending symbol order, each:
//! |   symbol (1)        |
//! |   code length (1)   |  1..=255
//! |   code bits         |  ceil(len / 8) bytes, MSB-first, zero padded
//! +---------------------+
//! | crc32 (4)           |  u32 big-endian over everything above
//! +---------------------+
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::error::{Result, TableError};
use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanTree, Node};

/// Longest code a table may declare.
///
/// 256 leaves cannot produce a path longer than 255 edges.
pub const MAX_CODE_LEN: usize = 255;

/// Current revision of the serialized table layout.
pub const TABLE_VERSION: u8 = 1;

const TABLE_HEADER_LEN: usize = 3;
const TABLE_CRC_LEN: usize = 4;

/// A variable-length bit sequence of up to [`MAX_CODE_LEN`] bits.
///
/// Bit `i` is stored MSB-first in `words[i / 64]`. Bits past `len` are
/// always zero, so derived equality and hashing compare sequences exactly.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Code {
    words: [u64; 4],
    len: u8,
}

impl Code {
    /// The zero-length code.
    pub const fn empty() -> Self {
        Self {
            words: [0; 4],
            len: 0,
        }
    }

    /// Build a code from the first `len` bits of `bytes` (MSB-first).
    ///
    /// Bits after `len` are ignored. Returns `None` if `len` exceeds
    /// [`MAX_CODE_LEN`] or `bytes` holds fewer than `len` bits.
    pub fn from_packed(bytes: &[u8], len: usize) -> Option<Self> {
        if len > MAX_CODE_LEN || bytes.len() * 8 < len {
            return None;
        }
        let mut code = Self::empty();
        for i in 0..len {
            code.push(bytes[i / 8] & (0x80 >> (i % 8)) != 0);
        }
        Some(code)
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append one bit.
    ///
    /// Callers keep codes within [`MAX_CODE_LEN`]; the tree cannot produce
    /// deeper paths and the decoder stops at the longest table entry.
    pub(crate) fn push(&mut self, bit: bool) {
        debug_assert!(self.len() < MAX_CODE_LEN);
        let i = self.len();
        if bit {
            self.words[i / 64] |= 1u64 << (63 - i % 64);
        }
        self.len += 1;
    }

    /// Return a copy with `bit` appended.
    pub(crate) fn with(mut self, bit: bool) -> Self {
        self.push(bit);
        self
    }

    /// Bit at position `i` (0 = first bit emitted).
    pub fn bit(&self, i: usize) -> bool {
        debug_assert!(i < self.len());
        self.words[i / 64] & (1u64 << (63 - i % 64)) != 0
    }

    /// Iterate over the bits in emission order.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |i| self.bit(i))
    }

    /// Split into right-aligned `(value, count)` pieces of at most 64 bits.
    pub fn chunks(&self) -> impl Iterator<Item = (u64, usize)> + '_ {
        let len = self.len();
        (0..len.div_ceil(64)).map(move |w| {
            let count = (len - w * 64).min(64);
            (self.words[w] >> (64 - count), count)
        })
    }

    /// True if `self` is a prefix of `other` (equal codes included).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.len > other.len {
            return false;
        }
        let len = self.len();
        let full = len / 64;
        if self.words[..full] != other.words[..full] {
            return false;
        }
        let rest = len % 64;
        if rest == 0 {
            return true;
        }
        let mask = !0u64 << (64 - rest);
        self.words[full] == other.words[full] & mask
    }

    /// Pack into `ceil(len / 8)` bytes, MSB-first, zero padded.
    pub fn to_packed(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.len().div_ceil(8)];
        for (i, bit) in self.bits().enumerate() {
            if bit {
                bytes[i / 8] |= 0x80 >> (i % 8);
            }
        }
        bytes
    }
}

impl Ord for Code {
    /// Lexicographic bit order; a prefix sorts before its extensions.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Unused bits are zero, so word order is bit order until one code ends
        self.words
            .cmp(&other.words)
            .then(self.len.cmp(&other.len))
    }
}

impl PartialOrd for Code {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code(\"{}\")", self)
    }
}

/// Error parsing a code written as a string of `0` and `1`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid code literal {0:?}")]
pub struct ParseCodeError(String);

impl FromStr for Code {
    type Err = ParseCodeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.len() > MAX_CODE_LEN {
            return Err(ParseCodeError(s.to_string()));
        }
        let mut code = Code::empty();
        for c in s.chars() {
            match c {
                '0' => code.push(false),
                '1' => code.push(true),
                _ => return Err(ParseCodeError(s.to_string())),
            }
        }
        Ok(code)
    }
}

/// Symbol to prefix-code mapping.
///
/// Every code is non-empty and no code is a prefix of another. Codebooks
/// built from a tree satisfy this by construction; deserialized ones are
/// checked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Codebook {
    codes: BTreeMap<u8, Code>,
}

impl Codebook {
    /// Codebook with no symbols, used for empty input.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Walk the tree and record the root-to-leaf path of every leaf.
    ///
    /// A tree that is a single leaf gets the one-bit code `0`, so every
    /// occurrence still costs one bit in the stream.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        let mut stack = vec![(tree.root(), Code::empty())];

        while let Some((id, path)) = stack.pop() {
            match *tree.node(id) {
                Node::Leaf { symbol, .. } => {
                    let code = if path.is_empty() { path.with(false) } else { path };
                    codes.insert(symbol, code);
                }
                Node::Internal { left, right, .. } => {
                    stack.push((right, path.with(true)));
                    stack.push((left, path.with(false)));
                }
            }
        }

        debug!(symbols = codes.len(), "generated codebook");
        Self { codes }
    }

    /// Build the tree for `freqs` and derive its codebook.
    ///
    /// # Errors
    /// `Error::EmptyInput` if the table is empty.
    pub fn from_frequencies(freqs: &FrequencyTable) -> Result<Self> {
        Ok(Self::from_tree(&HuffmanTree::from_frequencies(freqs)?))
    }

    /// Build a codebook from explicit entries, validating it.
    ///
    /// # Errors
    /// `TableError` for empty or over-long codes, duplicate symbols, or
    /// codes that are not prefix-free.
    pub fn from_codes<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, Code)>,
    {
        let mut codes = BTreeMap::new();
        for (symbol, code) in entries {
            if code.is_empty() {
                return Err(TableError::EmptyCode { symbol }.into());
            }
            if codes.insert(symbol, code).is_some() {
                return Err(TableError::DuplicateSymbol { symbol }.into());
            }
        }
        let book = Self { codes };
        book.validate()?;
        Ok(book)
    }

    /// Check that codes are non-empty and prefix-free.
    ///
    /// After sorting codes lexicographically, any prefix relation shows up
    /// between neighbours, so one linear pass suffices.
    pub fn validate(&self) -> Result<()> {
        let mut sorted: Vec<(Code, u8)> = self.codes.iter().map(|(&s, &c)| (c, s)).collect();
        sorted.sort_unstable();

        for &(code, symbol) in &sorted {
            if code.is_empty() {
                return Err(TableError::EmptyCode { symbol }.into());
            }
        }
        for pair in sorted.windows(2) {
            let (a, sa) = pair[0];
            let (b, sb) = pair[1];
            if a.is_prefix_of(&b) {
                return Err(TableError::NotPrefixFree {
                    shorter: sa,
                    longer: sb,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Code assigned to `symbol`, if any.
    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    /// Length of the longest code (0 for an empty codebook).
    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Total bits needed to encode input with the given frequencies.
    ///
    /// Symbols without a code contribute nothing. Saturates at `u64::MAX`.
    pub fn encoded_bit_len(&self, freqs: &FrequencyTable) -> u64 {
        freqs
            .iter()
            .filter_map(|(symbol, count)| self.get(symbol).map(|c| count.saturating_mul(c.len() as u64)))
            .fold(0u64, u64::saturating_add)
    }

    /// Kraft sum `Σ 2^-len` over all codes, as a float.
    pub fn kraft_sum(&self) -> f64 {
        self.codes.values().map(|c| (-(c.len() as f64)).exp2()).sum()
    }

    /// Exact test of `Σ 2^-len == 1`, i.e. the codes fill a full binary tree.
    pub fn is_complete(&self) -> bool {
        let max = self.max_code_len();
        if max == 0 {
            return false;
        }
        let mut per_len = vec![0u64; max + 1];
        for code in self.codes.values() {
            per_len[code.len()] += 1;
        }
        // Pair up slots from the deepest level upward; an odd level leaves a hole
        let mut carry = 0u64;
        for count in per_len[1..].iter().rev() {
            let units = count + carry;
            if units % 2 == 1 {
                return false;
            }
            carry = units / 2;
        }
        carry == 1
    }

    /// Inverse mapping for decoding.
    pub fn reverse(&self) -> ReverseCodebook {
        ReverseCodebook {
            symbols: self.codes.iter().map(|(&s, &c)| (c, s)).collect(),
            max_code_len: self.max_code_len(),
        }
    }

    /// Serialize the table (see the module docs for the layout).
    pub fn serialize(&self) -> Vec<u8> {
        let body: usize = self.codes.values().map(|c| 2 + c.len().div_ceil(8)).sum();
        let mut out = Vec::with_capacity(TABLE_HEADER_LEN + body + TABLE_CRC_LEN);

        out.push(TABLE_VERSION);
        out.extend_from_slice(&(self.codes.len() as u16).to_be_bytes());
        for (&symbol, code) in &self.codes {
            out.push(symbol);
            out.push(code.len() as u8);
            out.extend_from_slice(&code.to_packed());
        }

        let crc = crc32fast::hash(&out);
        out.extend_from_slice(&crc.to_be_bytes());
        out
    }

    /// Parse and validate a serialized table.
    ///
    /// # Errors
    /// `Error::CorruptTable` with the specific `TableError`.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let min = TABLE_HEADER_LEN + TABLE_CRC_LEN;
        if bytes.len() < min {
            return Err(TableError::TooShort {
                field: "table header",
                required: min,
                actual: bytes.len(),
            }
            .into());
        }

        let (body, crc_bytes) = bytes.split_at(bytes.len() - TABLE_CRC_LEN);
        let expected = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
        let actual = crc32fast::hash(body);
        if expected != actual {
            return Err(TableError::ChecksumMismatch { expected, actual }.into());
        }

        if body[0] != TABLE_VERSION {
            return Err(TableError::UnsupportedVersion(body[0]).into());
        }
        let count = u16::from_be_bytes([body[1], body[2]]) as usize;
        if count > 256 {
            return Err(TableError::TooManySymbols(count).into());
        }

        let mut entries = Vec::with_capacity(count);
        let mut pos = TABLE_HEADER_LEN;
        for _ in 0..count {
            let Some(&[symbol, len]) = body.get(pos..pos + 2).and_then(|s| <&[u8; 2]>::try_from(s).ok())
            else {
                return Err(TableError::TooShort {
                    field: "table record",
                    required: pos + 2,
                    actual: body.len(),
                }
                .into());
            };
            let len = len as usize;
            if len == 0 {
                return Err(TableError::EmptyCode { symbol }.into());
            }

            let start = pos + 2;
            let end = start + len.div_ceil(8);
            let code = body
                .get(start..end)
                .and_then(|packed| Code::from_packed(packed, len))
                .ok_or(TableError::TooShort {
                    field: "code bits",
                    required: end,
                    actual: body.len(),
                })?;
            entries.push((symbol, code));
            pos = end;
        }

        if pos != body.len() {
            return Err(TableError::TrailingBytes(body.len() - pos).into());
        }

        Self::from_codes(entries)
    }
}

/// Code to symbol mapping used by the greedy decoder.
#[derive(Debug, Clone)]
pub struct ReverseCodebook {
    symbols: HashMap<Code, u8>,
    max_code_len: usize,
}

impl ReverseCodebook {
    /// Symbol whose code is exactly `code`.
    pub fn get(&self, code: &Code) -> Option<u8> {
        self.symbols.get(code).copied()
    }

    /// Longest code in the table; a longer candidate can never match.
    pub fn max_code_len(&self) -> usize {
        self.max_code_len
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
