//! # Progress — Sampled Block Progress Reporting
//!
//! Running totals and periodic progress lines for a streaming run. The core
//! sieve is single-threaded and synchronous, so this is plain owned state
//! folded in between block advances — no atomics, no reporter thread.
//!
//! The first few non-empty blocks are always reported (a fast sanity signal
//! that the run is producing output), after which only every Nth block is,
//! keeping stderr readable across the hundreds of thousands of blocks a
//! deep range produces.

use std::time::Instant;
use tracing::info;

/// Blocks always reported before sampling kicks in.
const ALWAYS_SHOW: u64 = 5;

/// Running totals for a streaming run, with sampled per-block reporting.
pub struct Progress {
    start: Instant,
    every: u64,
    blocks: u64,
    count: u64,
    /// Sum in u128: near the supported bound a u64 prime sum overflows.
    sum: u128,
}

impl Progress {
    /// `every` is the sampling cadence: a progress line per `every` blocks
    /// (0 is treated as 1).
    pub fn new(every: u64) -> Self {
        Progress {
            start: Instant::now(),
            every: every.max(1),
            blocks: 0,
            count: 0,
            sum: 0,
        }
    }

    /// Primes observed so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of primes observed so far.
    pub fn sum(&self) -> u128 {
        self.sum
    }

    /// Fold one block's batch into the totals, reporting per the cadence.
    /// Empty batches (leading blocks below the range's lower bound) count
    /// toward the block index but are never reported.
    pub fn observe_block(&mut self, batch: &[u64]) {
        self.blocks += 1;
        self.count += batch.len() as u64;
        self.sum += batch.iter().map(|&p| p as u128).sum::<u128>();
        if batch.is_empty() {
            return;
        }
        if self.blocks <= ALWAYS_SHOW || self.blocks % self.every == 0 {
            info!(
                block = self.blocks,
                count = self.count,
                batch = batch.len(),
                from = batch[0],
                to = batch[batch.len() - 1],
                "block complete"
            );
        }
    }

    /// Report final totals with elapsed time and rate.
    pub fn report_summary(&self) {
        let elapsed = self.start.elapsed();
        let rate = if elapsed.as_secs_f64() > 0.0 {
            self.count as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };
        let h = elapsed.as_secs() / 3600;
        let m = (elapsed.as_secs() % 3600) / 60;
        let s = elapsed.as_secs() % 60;
        info!(
            blocks = self.blocks,
            count = self.count,
            sum = %self.sum,
            rate = format_args!("{:.0}", rate),
            elapsed = format_args!("{:02}:{:02}:{:02}", h, m, s),
            "sieve complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Totals ─────────────────────────────────────────────────────

    /// Counters start at zero and accumulate across batches, empty ones
    /// included.
    #[test]
    fn totals_accumulate_across_batches() {
        let mut progress = Progress::new(100);
        assert_eq!(progress.count(), 0);
        assert_eq!(progress.sum(), 0);
        progress.observe_block(&[2, 3, 5]);
        progress.observe_block(&[]);
        progress.observe_block(&[7, 11]);
        assert_eq!(progress.count(), 5);
        assert_eq!(progress.sum(), 28);
        assert_eq!(progress.blocks, 3);
    }

    /// Sums that would overflow u64 accumulate correctly in u128.
    #[test]
    fn sum_survives_u64_overflow() {
        let mut progress = Progress::new(1);
        let big = u64::MAX - 1; // even, not a prime — but the arithmetic is what matters
        progress.observe_block(&[big]);
        progress.observe_block(&[big]);
        assert_eq!(progress.sum(), 2 * (big as u128));
    }

    /// A zero cadence is clamped rather than dividing by zero in the
    /// sampling check.
    #[test]
    fn zero_cadence_is_clamped() {
        let mut progress = Progress::new(0);
        progress.observe_block(&[2]);
        assert_eq!(progress.count(), 1);
    }

    /// report_summary must not panic immediately after construction, when
    /// elapsed time is ~0.
    #[test]
    fn summary_with_zero_elapsed() {
        Progress::new(1600).report_summary();
    }
}
