//! huffpack command-line tool.
//!
//! ## Usage
//!
//! ```bash
//! # Compress and restore a file
//! huffpack compress notes.txt notes.huf
//! huffpack decompress notes.huf notes.txt
//!
//! # Show the code table of a container
//! huffpack inspect notes.huf
//!
//! # Generate a reproducible sample and look at the numbers
//! huffpack sample sample.bin --seed 42
//! huffpack --stats compress sample.bin sample.huf
//! ```

mod config;
mod input_gen;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use huffpack_core::{compress_file, decompress_file, CodecStats, Container};

use config::{Action, Cli, Config};

fn main() -> Result<()> {
    let config = Config::from_cli(Cli::parse()).map_err(anyhow::Error::msg)?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    run(&config)
}

fn run(config: &Config) -> Result<()> {
    match &config.action {
        Action::Compress { input, output } => {
            let stats = compress_file(input, output)
                .with_context(|| format!("compressing {}", input.display()))?;
            report(config, &stats);
        }
        Action::Decompress { input, output } => {
            let stats = decompress_file(input, output)
                .with_context(|| format!("decompressing {}", input.display()))?;
            report(config, &stats);
        }
        Action::Inspect { input } => inspect(input)?,
        Action::Sample { output, size, seed } => {
            info!(seed, size, output = %output.display(), "writing sample");
            input_gen::write_sample_file(output, *seed, *size)
                .with_context(|| format!("writing {}", output.display()))?;
        }
    }
    Ok(())
}

fn report(config: &Config, stats: &CodecStats) {
    info!(
        raw_bytes = stats.raw_bytes,
        container_bytes = stats.container_bytes,
        ratio = stats.compression_ratio(),
        "done"
    );
    if config.print_stats {
        stats.print_summary();
    }
}

fn inspect(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let container = Container::parse(&bytes).with_context(|| format!("parsing {}", path.display()))?;

    println!("Container:  {} bytes", bytes.len());
    println!("Table:      {} bytes, {} symbols", container.codebook.serialize().len(), container.codebook.len());
    println!("Bit length: {} (+{} padding)", container.bit_len, container.padding());
    println!("Payload:    {} bytes", container.payload.len());
    println!("Complete:   {}", container.codebook.is_complete());
    println!();
    println!("SYMBOL  LEN  CODE");
    for (symbol, code) in container.codebook.iter() {
        println!("{:<6}  {:>3}  {}", printable(symbol), code.len(), code);
    }
    Ok(())
}

/// Render a byte as a quoted character when printable, hex otherwise.
fn printable(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        format!("'{}'", byte as char)
    } else {
        format!("{:#04x}", byte)
    }
}
