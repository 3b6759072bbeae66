//! Statistics for a single compress or decompress call.
//!
//! Collected by the codec facade and reported by the CLI. Sizes are
//! recorded from the raw (uncompressed) side and the container side so the
//! same struct describes both directions.

use std::time::{Duration, Instant};

/// Sizes, code shape and timing of one codec run.
#[derive(Debug, Clone)]
pub struct CodecStats {
    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Sizes ===
    /// Uncompressed bytes
    pub raw_bytes: u64,

    /// Total container bytes
    pub container_bytes: u64,

    /// Serialized code table bytes
    pub table_bytes: u64,

    /// Packed payload bytes
    pub payload_bytes: u64,

    /// Logical payload bits (padding excluded)
    pub bit_len: u64,

    // === Code shape ===
    /// Symbols in the code table
    pub distinct_symbols: usize,

    /// Longest code in bits
    pub max_code_len: usize,

    /// Shannon entropy of the raw bytes in bits per symbol
    pub entropy: f64,
}

impl CodecStats {
    /// Create empty stats with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            raw_bytes: 0,
            container_bytes: 0,
            table_bytes: 0,
            payload_bytes: 0,
            bit_len: 0,
            distinct_symbols: 0,
            max_code_len: 0,
            entropy: 0.0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Container size over raw size.
    ///
    /// Returns 0.0 if there was no raw data.
    pub fn compression_ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.container_bytes as f64 / self.raw_bytes as f64
        }
    }

    /// Average code length actually spent per raw byte.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.bit_len as f64 / self.raw_bytes as f64
        }
    }

    /// Raw bytes processed per second.
    pub fn throughput_bps(&self) -> f64 {
        let secs = self.duration().as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.raw_bytes as f64 / secs
        }
    }

    /// Padding bits in the final payload byte.
    pub fn padding_bits(&self) -> u64 {
        (self.payload_bytes * 8).saturating_sub(self.bit_len)
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Codec Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();

        println!("Raw:       {} bytes", self.raw_bytes);
        println!(
            "Container: {} bytes (table {}, payload {})",
            self.container_bytes, self.table_bytes, self.payload_bytes
        );
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!();

        println!("=== Code ===");
        println!("Symbols: {}", self.distinct_symbols);
        println!("Longest code: {} bits", self.max_code_len);
        println!("Bit length: {} (+{} padding)", self.bit_len, self.padding_bits());
        println!(
            "Bits/symbol: {:.3} (entropy {:.3})",
            self.bits_per_symbol(),
            self.entropy
        );
        println!();

        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
    }

    /// Export stats as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             raw_bytes={}\n\
             container_bytes={}\n\
             table_bytes={}\n\
             payload_bytes={}\n\
             bit_len={}\n\
             distinct_symbols={}\n\
             max_code_len={}\n\
             compression_ratio={:.4}\n\
             bits_per_symbol={:.4}\n\
             entropy={:.4}\n",
            self.duration().as_millis(),
            self.raw_bytes,
            self.container_bytes,
            self.table_bytes,
            self.payload_bytes,
            self.bit_len,
            self.distinct_symbols,
            self.max_code_len,
            self.compression_ratio(),
            self.bits_per_symbol(),
            self.entropy,
        )
    }
}

impl Default for CodecStats {
    fn default() -> Self {
        Self::new()
    }
}
