//! # Main — CLI Entry Point
//!
//! Parses arguments and routes subcommands to the execution functions in
//! `cli`. Results (counts and sums) go to stdout; structured logs and
//! progress lines go to stderr.
//!
//! ## Subcommands
//!
//! - `upto`: batch segmented sieve of all primes up to a limit.
//! - `range`: stream primes in an inclusive range block by block.
//!
//! ## Global Options
//!
//! - `--progress-every` / `PRIMESTREAM_PROGRESS_EVERY`: progress sampling
//!   cadence in blocks (the first few blocks are always shown).
//! - `LOG_FORMAT=json`: JSON log output for machine consumers.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "primestream", about = "Enumerate primes with a segmented sieve")]
struct Cli {
    /// Print a progress line every Nth block (the first few blocks are always shown)
    #[arg(long, env = "PRIMESTREAM_PROGRESS_EVERY", default_value_t = 1600)]
    progress_every: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count and sum all primes up to a limit (batch segmented sieve)
    Upto {
        /// Inclusive upper bound
        #[arg(long)]
        limit: u64,
    },
    /// Stream primes in an inclusive range, block by block
    Range {
        /// Inclusive lower bound
        #[arg(long)]
        first: u64,
        /// Inclusive upper bound
        #[arg(long)]
        last: u64,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Structured logging: LOG_FORMAT=json for machine consumers, human-readable otherwise
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    match &cli.command {
        Commands::Upto { limit } => cli::run_upto(*limit),
        Commands::Range { first, last } => cli::run_range(*first, *last, cli.progress_every),
    }
}
