//! Command-line configuration for the huffpack binary.
//!
//! `Cli` is the raw clap surface; `Config` is the resolved form the rest of
//! the binary works with. Anything randomized (the sample seed) is resolved
//! here and logged so a run can be repeated exactly.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;

/// Default size of a generated sample file.
pub const DEFAULT_SAMPLE_BYTES: usize = 64 * 1024;

#[derive(Parser, Debug)]
#[command(name = "huffpack")]
#[command(version)]
#[command(about = "Static Huffman compression with a self-describing container", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Print size and timing statistics after compress/decompress
    #[arg(long, global = true)]
    pub stats: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Compress a file into a container
    Compress { input: PathBuf, output: PathBuf },

    /// Restore the original file from a container
    Decompress { input: PathBuf, output: PathBuf },

    /// Describe a container without decompressing it
    Inspect { input: PathBuf },

    /// Write a generated sample file with mixed compressibility
    Sample {
        output: PathBuf,

        /// Size of the sample in bytes
        #[arg(long, default_value_t = DEFAULT_SAMPLE_BYTES)]
        size: usize,

        /// Random seed (default: time-based)
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// What the binary should do, with defaults resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Compress { input: PathBuf, output: PathBuf },
    Decompress { input: PathBuf, output: PathBuf },
    Inspect { input: PathBuf },
    Sample { output: PathBuf, size: usize, seed: u64 },
}

/// Complete configuration for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub action: Action,
    pub log_level: Level,
    pub print_stats: bool,
}

impl Config {
    /// Resolve parsed arguments into a configuration.
    ///
    /// # Errors
    /// Returns a message for an unknown log level.
    pub fn from_cli(cli: Cli) -> Result<Self, String> {
        let log_level = parse_level(&cli.log_level)?;

        let action = match cli.command {
            Command::Compress { input, output } => Action::Compress { input, output },
            Command::Decompress { input, output } => Action::Decompress { input, output },
            Command::Inspect { input } => Action::Inspect { input },
            Command::Sample { output, size, seed } => Action::Sample {
                output,
                size,
                seed: seed.unwrap_or_else(time_seed),
            },
        };

        Ok(Config {
            action,
            log_level,
            print_stats: cli.stats,
        })
    }
}

fn parse_level(level: &str) -> Result<Level, String> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(format!("unknown log level: {other}")),
    }
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
