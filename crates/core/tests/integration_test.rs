//! Integration tests for the full huffpack pipeline.
//!
//! These tests exercise the public API end to end: input -> compress ->
//! container bytes -> decompress -> output, plus the container properties
//! a second implementation would rely on.

use huffpack_core::{
    bitio::unpack_bits,
    compress, compress_with_stats, decompress,
    Codebook, Container, Error, FrequencyTable, HuffmanTree, TableError,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn codebook_for(data: &[u8]) -> Codebook {
    Codebook::from_frequencies(&FrequencyTable::from_bytes(data)).expect("non-empty input")
}

/// Random data with a skewed distribution so code lengths vary.
fn skewed_data(rng: &mut ChaCha8Rng, len: usize, alphabet: u8) -> Vec<u8> {
    (0..len)
        .map(|_| {
            let a = rng.gen_range(0..alphabet as u32);
            let b = rng.gen_range(0..alphabet as u32);
            a.min(b) as u8
        })
        .collect()
}

#[test]
fn test_round_trip_random_inputs() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for _ in 0..50 {
        let len = rng.gen_range(0..4096);
        let alphabet = rng.gen_range(1..=255u8);
        let data = skewed_data(&mut rng, len, alphabet);

        let compressed = compress(&data).expect("compression failed");
        let decoded = decompress(&compressed).expect("decompression failed");
        assert_eq!(decoded, data, "round trip mismatch for {len} bytes");
    }
}

#[test]
fn test_round_trip_uniform_random_bytes() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let data: Vec<u8> = (0..20_000).map(|_| rng.gen()).collect();

    let compressed = compress(&data).unwrap();
    assert_eq!(decompress(&compressed).unwrap(), data);
}

#[test]
fn test_round_trip_edge_inputs() {
    let inputs: Vec<Vec<u8>> = vec![
        Vec::new(),
        vec![0],
        vec![255],
        vec![b'Z'; 5],
        vec![b'X'; 65536],
        (0..=255).collect(),
        b"AB".to_vec(),
        b"ABABABAB".to_vec(),
    ];

    for data in inputs {
        let compressed = compress(&data).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), data);
    }
}

/// Every pair of distinct symbols has codes that are not prefixes of each other.
#[test]
fn test_prefix_free_codebooks() {
    let mut rng = ChaCha8Rng::seed_from_u64(1234);

    for _ in 0..20 {
        let data = skewed_data(&mut rng, 2000, 200);
        let book = codebook_for(&data);
        assert!(book.len() >= 2);

        for (x, cx) in book.iter() {
            for (y, cy) in book.iter() {
                if x != y {
                    assert!(!cx.is_prefix_of(cy), "{x}:{cx} prefixes {y}:{cy}");
                }
            }
        }
    }
}

#[test]
fn test_kraft_equality() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for _ in 0..20 {
        let alphabet = rng.gen_range(2..=255u8);
        let mut data = skewed_data(&mut rng, 3000, alphabet);
        // Make sure at least two symbols are present
        data.extend_from_slice(&[0, 1]);

        let book = codebook_for(&data);
        assert!(book.is_complete());
        assert_eq!(book.kraft_sum(), 1.0);
    }
}

/// Building twice from the same table, ties included, gives identical codes.
#[test]
fn test_determinism_with_ties() {
    // Every symbol has the same count: ties everywhere
    let freqs = FrequencyTable::from_counts((0..=255u8).map(|s| (s, 3)));
    let a = Codebook::from_frequencies(&freqs).unwrap();
    let b = Codebook::from_frequencies(&freqs.clone()).unwrap();
    assert_eq!(a, b);

    // A perfectly balanced tree: every code is 8 bits, in symbol order
    for (symbol, code) in a.iter() {
        assert_eq!(code.len(), 8);
        assert_eq!(code.to_packed(), vec![symbol]);
    }

    let data = b"aabbccddeeffgghh";
    assert_eq!(compress(data).unwrap(), compress(data).unwrap());
    assert_eq!(
        HuffmanTree::from_bytes(data).unwrap(),
        HuffmanTree::from_bytes(data).unwrap()
    );
}

#[test]
fn test_container_size_accounting() {
    let data = b"It was the best of times, it was the worst of times.".repeat(9);
    let (bytes, stats) = compress_with_stats(&data).unwrap();
    let container = Container::parse(&bytes).unwrap();

    let expected_bits: u64 = data
        .iter()
        .map(|&b| container.codebook.get(b).unwrap().len() as u64)
        .sum();
    assert_eq!(container.bit_len as u64, expected_bits);
    assert_eq!(
        container.payload.len() as u64,
        (container.bit_len as u64).div_ceil(8)
    );
    assert_eq!(
        container.codebook.encoded_bit_len(&FrequencyTable::from_bytes(&data)),
        expected_bits
    );

    assert_eq!(stats.bit_len, expected_bits);
    assert_eq!(stats.container_bytes, bytes.len() as u64);
    assert_eq!(
        stats.container_bytes,
        8 + stats.table_bytes + stats.payload_bytes
    );
}

#[test]
fn test_abab_scenario() {
    let bytes = compress(b"ABABABAB").unwrap();

    let table_len = u32::from_be_bytes(bytes[0..4].try_into().unwrap()) as usize;
    let bit_len_at = 4 + table_len;
    assert_eq!(&bytes[bit_len_at..bit_len_at + 4], &8u32.to_be_bytes());
    assert_eq!(&bytes[bit_len_at + 4..], &[0x55]);

    let container = Container::parse(&bytes).unwrap();
    assert_eq!(container.codebook.get(b'A').unwrap().to_string(), "0");
    assert_eq!(container.codebook.get(b'B').unwrap().to_string(), "1");

    assert_eq!(decompress(&bytes).unwrap(), b"ABABABAB");
}

#[test]
fn test_single_symbol_scenario() {
    let bytes = compress(b"ZZZZZ").unwrap();
    let container = Container::parse(&bytes).unwrap();

    assert_eq!(container.codebook.get(b'Z').unwrap().to_string(), "0");
    assert_eq!(container.bit_len, 5);
    assert_eq!(container.payload.len(), 1);
    assert_eq!(unpack_bits(&container.payload, 5).unwrap(), vec![false; 5]);

    assert_eq!(decompress(&bytes).unwrap(), b"ZZZZZ");
}

#[test]
fn test_empty_scenario() {
    let bytes = compress(b"").unwrap();
    let container = Container::parse(&bytes).unwrap();
    assert!(container.codebook.is_empty());
    assert_eq!(container.bit_len, 0);
    assert!(container.payload.is_empty());
    assert_eq!(decompress(&bytes).unwrap(), Vec::<u8>::new());
}

#[test]
fn test_table_length_exceeds_file() {
    let mut bytes = compress(b"some input").unwrap();
    let too_long = bytes.len() as u32;
    bytes[0..4].copy_from_slice(&too_long.to_be_bytes());

    assert!(matches!(
        decompress(&bytes),
        Err(Error::CorruptTable(TableError::LengthOverrun { .. }))
    ));
}

#[test]
fn test_corrupted_table_is_detected() {
    let original = compress(b"corruption inside the table").unwrap();

    // Flip each byte of the table region in turn
    let table_len = u32::from_be_bytes(original[0..4].try_into().unwrap()) as usize;
    for i in 4..4 + table_len {
        let mut bytes = original.clone();
        bytes[i] ^= 0x40;
        assert!(
            matches!(decompress(&bytes), Err(Error::CorruptTable(_))),
            "flip at byte {i} went unnoticed"
        );
    }
}

#[test]
fn test_truncated_container() {
    let bytes = compress(&b"truncate me please".repeat(10)).unwrap();

    let short = &bytes[..bytes.len() - 3];
    assert!(matches!(decompress(short), Err(Error::TruncatedStream { .. })));
}

#[test]
fn test_tampered_bit_length() {
    // a=0, b=110, c=100, d=101, r=111; 23 bits
    let mut bytes = compress(b"abracadabra").unwrap();
    let table_len = u32::from_be_bytes(bytes[0..4].try_into().unwrap()) as usize;
    let at = 4 + table_len;

    // 21 bits ends two bits into the final "r"
    bytes[at..at + 4].copy_from_slice(&21u32.to_be_bytes());
    assert!(matches!(
        decompress(&bytes),
        Err(Error::TruncatedStream { bit_len: 21, pending: 2 })
    ));
}
