//! Sample input generation.
//!
//! `huffpack sample` writes a file whose sections compress very
//! differently, so the effect of the symbol distribution on code lengths
//! shows up in `--stats` and `inspect`.
//!
//! # Sections
//!
//! - runs of a single byte (one-symbol alphabets, 1-bit codes)
//! - English-like text drawn from a weighted letter table
//! - geometric bytes where small values dominate (long code tail)
//! - uniform random bytes (close to 8 bits per symbol)

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Letters roughly in English frequency order, space first.
const TEXT_ALPHABET: &[u8] = b" etaoinshrdlcumwfgypbvkjxqz.,\n";

/// Longest section before switching to another kind.
const SECTION_BYTES: usize = 4096;

/// Generate `size` bytes of mixed-compressibility data from `seed`.
pub fn generate_sample_data(seed: u64, size: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size);

    while data.len() < size {
        let len = (size - data.len()).min(rng.gen_range(SECTION_BYTES / 4..=SECTION_BYTES));

        match rng.gen_range(0..10u8) {
            0..=1 => {
                let byte: u8 = rng.gen();
                data.resize(data.len() + len, byte);
            }
            2..=5 => data.extend((0..len).map(|_| text_byte(&mut rng))),
            6..=7 => data.extend((0..len).map(|_| geometric_byte(&mut rng))),
            _ => data.extend((0..len).map(|_| rng.gen::<u8>())),
        }
    }

    data
}

/// Pick a letter, favouring the front of `TEXT_ALPHABET`.
fn text_byte(rng: &mut ChaCha8Rng) -> u8 {
    // min of two uniform draws is biased toward small indices
    let a = rng.gen_range(0..TEXT_ALPHABET.len());
    let b = rng.gen_range(0..TEXT_ALPHABET.len());
    TEXT_ALPHABET[a.min(b)]
}

/// Count coin flips until the first head, capped at 255.
fn geometric_byte(rng: &mut ChaCha8Rng) -> u8 {
    let mut value = 0u8;
    while value < u8::MAX && rng.gen_bool(0.5) {
        value += 1;
    }
    value
}

/// Generate a sample and write it to `path`.
pub fn write_sample_file(path: &std::path::Path, seed: u64, size: usize) -> std::io::Result<()> {
    std::fs::write(path, generate_sample_data(seed, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_sizes() {
        for size in [0, 1, 100, 4095, 4096, 10_000, 100_000] {
            assert_eq!(generate_sample_data(999, size).len(), size);
        }
    }

    #[test]
    fn test_determinism() {
        assert_eq!(generate_sample_data(12345, 5000), generate_sample_data(12345, 5000));
    }

    #[test]
    fn test_different_seeds() {
        assert_ne!(generate_sample_data(1, 5000), generate_sample_data(2, 5000));
    }

    #[test]
    fn test_sample_round_trips() {
        let data = generate_sample_data(42, 50_000);
        let container = huffpack_core::compress(&data).unwrap();
        assert_eq!(huffpack_core::decompress(&container).unwrap(), data);
    }

    #[test]
    fn test_geometric_bias() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let zeros = (0..1000).filter(|_| geometric_byte(&mut rng) == 0).count();
        assert!(zeros > 350 && zeros < 650, "zeros = {zeros}");
    }
}
