//! Compressor and decompressor entry points.
//!
//! Compression runs frequency counting, tree construction, codebook
//! generation, bit packing and container serialization in order.
//! Decompression parses the container, unpacks exactly `bit_len` bits and
//! matches them greedily against the reverse codebook.
//!
//! Empty input is not an error: it compresses to a container with an empty
//! table and a zero bit length, and that container decompresses to empty
//! output.

use std::path::Path;

use tracing::{debug, info};

use crate::bitio::{packed_len, BitReader, BitWriter, PackedBits};
use crate::codebook::{Code, Codebook, ReverseCodebook};
use crate::container::{check_bit_len, Container};
use crate::error::{Error, Result, TableError};
use crate::frequency::FrequencyTable;
use crate::stats::CodecStats;

/// Compress `input` into a container.
///
/// # Errors
/// `Error::SizeLimitExceeded` if the bitstream does not fit in 32 bits.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    compress_with_stats(input).map(|(bytes, _)| bytes)
}

/// Compress `input` and report what happened.
pub fn compress_with_stats(input: &[u8]) -> Result<(Vec<u8>, CodecStats)> {
    let mut stats = CodecStats::new();

    let freqs = FrequencyTable::from_bytes(input);
    debug!(bytes = input.len(), distinct = freqs.distinct(), "counted frequencies");

    let container = if freqs.is_empty() {
        Container::empty()
    } else {
        let codebook = Codebook::from_frequencies(&freqs)?;
        let packed = encode(&codebook, input)?;
        Container::new(codebook, packed)?
    };

    let table_bytes = container.codebook.serialize().len();
    let bytes = container.serialize();

    stats.raw_bytes = input.len() as u64;
    stats.container_bytes = bytes.len() as u64;
    stats.table_bytes = table_bytes as u64;
    stats.payload_bytes = container.payload.len() as u64;
    stats.bit_len = container.bit_len as u64;
    stats.distinct_symbols = container.codebook.len();
    stats.max_code_len = container.codebook.max_code_len();
    stats.entropy = freqs.entropy();
    stats.complete();

    debug!(
        bit_len = container.bit_len,
        container_bytes = bytes.len(),
        "compressed"
    );
    Ok((bytes, stats))
}

/// Restore the original bytes from a container.
///
/// # Errors
/// - `Error::CorruptTable` if the container or its table is malformed
/// - `Error::TruncatedStream` if the payload ends mid-code
pub fn decompress(container: &[u8]) -> Result<Vec<u8>> {
    decompress_with_stats(container).map(|(bytes, _)| bytes)
}

/// Decompress and report what happened.
pub fn decompress_with_stats(bytes: &[u8]) -> Result<(Vec<u8>, CodecStats)> {
    let mut stats = CodecStats::new();

    let container = Container::parse(bytes)?;
    debug!(
        symbols = container.codebook.len(),
        bit_len = container.bit_len,
        "parsed container"
    );

    let reverse = container.codebook.reverse();
    let output = decode(&reverse, &container.payload, container.bit_len as u64)?;

    stats.raw_bytes = output.len() as u64;
    stats.container_bytes = bytes.len() as u64;
    stats.table_bytes = container.codebook.serialize().len() as u64;
    stats.payload_bytes = container.payload.len() as u64;
    stats.bit_len = container.bit_len as u64;
    stats.distinct_symbols = container.codebook.len();
    stats.max_code_len = container.codebook.max_code_len();
    stats.entropy = FrequencyTable::from_bytes(&output).entropy();
    stats.complete();

    debug!(bytes = output.len(), "decompressed");
    Ok((output, stats))
}

/// Concatenate the code of every input byte.
///
/// The total length is computed before anything is written so oversized
/// input fails without packing.
///
/// # Errors
/// - `Error::CorruptTable` if a byte has no code in `codebook`
/// - `Error::SizeLimitExceeded` if the bitstream does not fit in 32 bits
pub fn encode(codebook: &Codebook, input: &[u8]) -> Result<PackedBits> {
    let mut lookup: [Option<&Code>; 256] = [None; 256];
    for (symbol, code) in codebook.iter() {
        lookup[symbol as usize] = Some(code);
    }

    let mut bits = 0u64;
    for &byte in input {
        let code = lookup[byte as usize].ok_or(TableError::MissingSymbol { symbol: byte })?;
        bits += code.len() as u64;
    }
    check_bit_len(bits)?;

    let mut writer = BitWriter::with_capacity(packed_len(bits) as usize);
    for &byte in input {
        if let Some(code) = lookup[byte as usize] {
            writer.write_code(code)?;
        }
    }

    let (bytes, bit_len) = writer.finish_with_len();
    Ok(PackedBits { bytes, bit_len })
}

/// Greedily decode the first `bit_len` bits of `payload`.
///
/// Bits accumulate into a candidate code; whenever it equals a table entry
/// the symbol is emitted and the candidate resets. Prefix-freedom makes the
/// first match the only match.
///
/// # Errors
/// - `Error::TruncatedStream` if `payload` is shorter than `bit_len`, or
///   unmatched bits remain at the end
/// - `Error::CorruptTable` if the candidate outgrows the longest code,
///   which only an incomplete table allows
pub fn decode(reverse: &ReverseCodebook, payload: &[u8], bit_len: u64) -> Result<Vec<u8>> {
    let available = payload.len() as u64 * 8;
    if available < bit_len {
        return Err(Error::TruncatedStream {
            bit_len,
            pending: (bit_len - available) as usize,
        });
    }

    let mut reader = BitReader::with_bit_len(payload, bit_len)?;
    let max_len = reverse.max_code_len();
    let mut output = Vec::with_capacity((bit_len / max_len.max(1) as u64) as usize);
    let mut candidate = Code::empty();

    while !reader.is_empty() {
        candidate.push(reader.read_bit()?);
        if let Some(symbol) = reverse.get(&candidate) {
            output.push(symbol);
            candidate = Code::empty();
        } else if candidate.len() >= max_len {
            let position = reader.position() - candidate.len() as u64;
            return Err(TableError::UnmatchedBits { position }.into());
        }
    }

    if !candidate.is_empty() {
        return Err(Error::TruncatedStream {
            bit_len,
            pending: candidate.len(),
        });
    }

    Ok(output)
}

/// Compress the file at `input` into a container at `output`.
pub fn compress_file(input: &Path, output: &Path) -> Result<CodecStats> {
    let data = std::fs::read(input)?;
    let (bytes, stats) = compress_with_stats(&data)?;
    std::fs::write(output, &bytes)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        raw_bytes = stats.raw_bytes,
        container_bytes = stats.container_bytes,
        "compressed file"
    );
    Ok(stats)
}

/// Decompress the container at `input` into `output`.
pub fn decompress_file(input: &Path, output: &Path) -> Result<CodecStats> {
    let bytes = std::fs::read(input)?;
    let (data, stats) = decompress_with_stats(&bytes)?;
    std::fs::write(output, &data)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        raw_bytes = stats.raw_bytes,
        "decompressed file"
    );
    Ok(stats)
}
