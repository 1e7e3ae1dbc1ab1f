//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. One function per
//! subcommand, each returning `anyhow::Result` so construction errors from
//! the library surface with their `Display` message and a nonzero exit.

use anyhow::Result;
use primestream::progress::Progress;
use primestream::segment;
use primestream::stream::PrimeBlockIter;
use tracing::info;

/// Run the batch engine and print the total count and sum.
pub fn run_upto(limit: u64) -> Result<()> {
    info!(limit, "batch sieve starting");
    let start = std::time::Instant::now();
    let primes = segment::generate_primes_upto(limit)?;
    let sum: u128 = primes.iter().map(|&p| p as u128).sum();
    info!(
        count = primes.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "batch sieve complete"
    );
    println!("Found {} primes <= {}", primes.len(), limit);
    println!("  Sum {}", sum);
    Ok(())
}

/// Consume the streaming iterator block by block, with sampled progress.
pub fn run_range(first: u64, last: u64, progress_every: u64) -> Result<()> {
    info!(first, last, "streaming sieve starting");
    let mut iter = PrimeBlockIter::new(first, last)?;
    let mut progress = Progress::new(progress_every);
    while let Some(batch) = iter.advance() {
        progress.observe_block(batch);
    }
    progress.report_summary();
    println!("Found {} primes in [{}, {}]", progress.count(), first, last);
    println!("  Sum {}", progress.sum());
    Ok(())
}
