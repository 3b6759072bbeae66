//! huffpack-core: static Huffman compression with a self-describing container
//!
//! This library compresses a byte buffer with a single static Huffman pass
//! and stores the code table next to the packed bitstream, so a container
//! can be decoded with nothing but its own bytes.
//!
//! # Architecture
//!
//! The pipeline is split along clear module boundaries:
//! - `frequency`: byte occurrence counts
//! - `tree`: deterministic Huffman tree construction
//! - `codebook`: prefix codes, their reverse mapping and table serialization
//! - `bitio`: MSB-first bit packing with explicit padding accounting
//! - `container`: the `[table_len][table][bit_len][payload]` wire format
//! - `codec`: compress / decompress entry points
//! - `stats`: sizes and timing of one run
//!
//! # Design Principles
//!
//! - **No panics**: malformed containers produce structured errors
//! - **Deterministic**: equal frequency tables always give identical codes
//! - **Exact**: the stored bit length makes padding unambiguous
//!
//! # Example
//! ```
//! let container = huffpack_core::compress(b"ABABABAB").unwrap();
//! assert_eq!(huffpack_core::decompress(&container).unwrap(), b"ABABABAB");
//! ```

pub mod bitio;
pub mod codebook;
pub mod codec;
pub mod container;
pub mod error;
pub mod frequency;
pub mod stats;
pub mod tree;

// Re-export commonly used types
pub use codebook::{Code, Codebook, ReverseCodebook};
pub use codec::{compress, compress_file, compress_with_stats, decompress, decompress_file, decompress_with_stats};
pub use container::Container;
pub use error::{Error, Result, TableError};
pub use frequency::FrequencyTable;
pub use stats::CodecStats;
pub use tree::HuffmanTree;
