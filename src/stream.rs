//! # Stream — Block Iterator with On-Demand Prime Discovery
//!
//! The streaming enumeration mode: primes in an inclusive range
//! `[first, last]`, produced lazily one block-sized batch at a time. Unlike
//! the batch engine, nothing is precomputed upfront — sieving primes are
//! discovered by trial division exactly when their squares become reachable
//! by the current block, so the iterator works for bounds where a full
//! `isqrt(last)` seed sieve would be wasteful or unknown in advance.
//!
//! ## Iteration contract
//!
//! Forward-only, finite, not restartable: a second traversal requires a new
//! iterator. The generator is an explicit state object advanced by
//! [`PrimeBlockIter::advance`] — block cursor, bitmap, and the sieving-prime
//! list with carried offsets are ordinary inspectable data, with an
//! [`Iterator`] impl layered on top for lazy-sequence consumers.
//!
//! Sieving always starts from block 0 even when `first` is large: on-demand
//! discovery is only correct if every earlier block has been sieved, so the
//! leading blocks are processed and their output filtered down to values
//! `>= first` (which may yield empty batches). A block straddling `last`
//! is sieved in full but reports only values `<= last`.

use crate::error::SieveError;
use crate::segment::BlockState;
use crate::sieve::{self, MAX_LIMIT};

/// Streaming prime iterator over the inclusive range `[first, last]`.
///
/// Each advance yields the primes of one block intersected with the range.
/// The bitmap, the offset array, and the output buffer are allocated once
/// and reused; per-block cost is the marking pass plus the trial division
/// for newly discovered sieving primes (asymptotically negligible next to
/// marking).
pub struct PrimeBlockIter {
    block: BlockState,
    first: u64,
    last: u64,
    /// Next odd number to trial-divide for sieving-prime discovery.
    candidate: u64,
    batch: Vec<u64>,
}

impl PrimeBlockIter {
    /// Set up an iterator over `[first, last]`, both inclusive.
    ///
    /// Rejects `first > last` and bounds beyond [`MAX_LIMIT`] before any
    /// sieving begins; there are no runtime error paths after construction.
    pub fn new(first: u64, last: u64) -> Result<Self, SieveError> {
        if first > last {
            return Err(SieveError::InvalidRange { first, last });
        }
        if last > MAX_LIMIT {
            return Err(SieveError::LimitTooLarge { limit: last });
        }
        Ok(PrimeBlockIter {
            block: BlockState::new(),
            first,
            last,
            candidate: 3,
            batch: Vec::new(),
        })
    }

    /// Sieve one block and return its batch, or `None` once the block start
    /// has passed `last`. The returned slice is valid until the next call;
    /// the `Iterator` impl copies it out for consumers that need ownership.
    pub fn advance(&mut self) -> Option<&[u64]> {
        if self.block.start() > self.last {
            return None;
        }
        let block_end = self.block.end();

        // Discover sieving primes until the smallest untested candidate's
        // square is beyond this block. Candidates run in increasing order,
        // so the known primes always cover trial division up to the
        // candidate's square root. A survivor's square lands in this block
        // (every earlier block end was below it), satisfying admit().
        while (self.candidate as u128) * (self.candidate as u128) <= block_end as u128 {
            if sieve::trial_is_prime(self.candidate, self.block.sieving_primes()) {
                self.block.admit(self.candidate);
            }
            self.candidate += 2;
        }

        self.block.reset();
        self.block.mark();

        self.batch.clear();
        if self.block.start() == 0 && self.first <= 2 && self.last >= 2 {
            self.batch.push(2); // 2 has no odd-bitmap slot
        }
        let low = self.first.max(self.block.start());
        let high = self.last.min(block_end);
        self.block.extract_into(low, high, &mut self.batch);
        self.block.advance();
        Some(&self.batch)
    }
}

impl Iterator for PrimeBlockIter {
    type Item = Vec<u64>;

    fn next(&mut self) -> Option<Vec<u64>> {
        self.advance().map(<[u64]>::to_vec)
    }
}

#[cfg(test)]
mod tests {
    //! Validates the streaming contract: concatenated batches equal the
    //! batch engine's output, block seams never duplicate or reorder,
    //! range bounds are honored on both ends, and 2 is synthesized exactly
    //! once when the range covers it.

    use super::*;
    use crate::segment::{generate_primes_upto, BLOCK_SIZE};

    fn collect_all(first: u64, last: u64) -> Vec<u64> {
        PrimeBlockIter::new(first, last).unwrap().flatten().collect()
    }

    // ── Equivalence With the Batch Engine ───────────────────────────

    /// Concatenation across all blocks equals the batch engine's output,
    /// for bounds at and around the block boundary.
    #[test]
    fn stream_matches_batch_at_block_boundaries() {
        for last in [BLOCK_SIZE - 1, BLOCK_SIZE, BLOCK_SIZE + 1] {
            assert_eq!(
                collect_all(0, last),
                generate_primes_upto(last).unwrap(),
                "last {}",
                last
            );
        }
    }

    /// Several blocks deep: π(300000) = 25997 primes, identical sequences.
    #[test]
    fn stream_matches_batch_deep() {
        let streamed = collect_all(2, 300_000);
        let batch = generate_primes_upto(300_000).unwrap();
        assert_eq!(streamed.len(), 25_997);
        assert_eq!(streamed, batch);
    }

    // ── Block Seams ─────────────────────────────────────────────────

    /// The last value of each non-empty batch is strictly below the first
    /// value of the next non-empty batch: no duplicates, no reordering.
    #[test]
    fn consecutive_batches_strictly_ordered() {
        let batches: Vec<Vec<u64>> = PrimeBlockIter::new(0, 400_000).unwrap().collect();
        let mut previous_last = 0u64;
        for batch in batches.iter().filter(|b| !b.is_empty()) {
            assert!(batch.windows(2).all(|w| w[0] < w[1]));
            assert!(
                previous_last < batch[0],
                "seam violation: {} then {}",
                previous_last,
                batch[0]
            );
            previous_last = *batch.last().unwrap();
        }
    }

    // ── Range Bounds ────────────────────────────────────────────────

    /// A lower bound deep into the range: exactly the primes in
    /// [10^6, 10^6 + 100] and nothing below, even though sieving started
    /// at block 0.
    #[test]
    fn range_query_honors_lower_bound() {
        assert_eq!(
            collect_all(1_000_000, 1_000_100),
            vec![1_000_003, 1_000_033, 1_000_037, 1_000_039, 1_000_081, 1_000_099]
        );
    }

    /// A block straddling `last` reports only values <= last: nothing
    /// beyond 70000 surfaces although the final block was sieved in full.
    #[test]
    fn straddling_block_trims_to_last() {
        let primes = collect_all(0, 70_000);
        assert_eq!(primes.len(), 6935); // π(70000)
        assert_eq!(*primes.last().unwrap(), 69_997);
        assert!(primes.iter().all(|&p| p <= 70_000));
    }

    /// Leading blocks below `first` still yield batches — empty ones.
    #[test]
    fn leading_blocks_yield_empty_batches() {
        let batches: Vec<Vec<u64>> = PrimeBlockIter::new(1_000_000, 1_000_100).unwrap().collect();
        let first_nonempty = batches.iter().position(|b| !b.is_empty()).unwrap();
        assert_eq!(first_nonempty as u64, 1_000_000 / BLOCK_SIZE);
        assert!(batches[..first_nonempty].iter().all(|b| b.is_empty()));
    }

    // ── The Special Case 2 ──────────────────────────────────────────

    /// 2 appears exactly once when first <= 2 <= last, at the head of the
    /// first batch.
    #[test]
    fn two_emitted_exactly_once() {
        for first in [0u64, 1, 2] {
            let primes = collect_all(first, 100);
            assert_eq!(primes[0], 2, "first {}", first);
            assert_eq!(primes.iter().filter(|&&p| p == 2).count(), 1);
        }
    }

    /// 2 is suppressed when the range excludes it on either side.
    #[test]
    fn two_suppressed_outside_range() {
        assert_eq!(collect_all(3, 10), vec![3, 5, 7]);
        assert_eq!(collect_all(0, 1), Vec::<u64>::new());
    }

    // ── Degenerate Ranges ───────────────────────────────────────────

    /// Single-value ranges: a prime yields itself, a composite nothing.
    #[test]
    fn single_value_ranges() {
        assert_eq!(collect_all(2, 2), vec![2]);
        assert_eq!(collect_all(13, 13), vec![13]);
        assert_eq!(collect_all(15, 15), Vec::<u64>::new());
        assert_eq!(collect_all(0, 0), Vec::<u64>::new());
    }

    /// Construction rejects inverted ranges and oversized bounds before
    /// any sieving.
    #[test]
    fn construction_rejects_bad_bounds() {
        assert_eq!(
            PrimeBlockIter::new(10, 3).map(|_| ()),
            Err(SieveError::InvalidRange { first: 10, last: 3 })
        );
        assert_eq!(
            PrimeBlockIter::new(0, MAX_LIMIT + 1).map(|_| ()),
            Err(SieveError::LimitTooLarge { limit: MAX_LIMIT + 1 })
        );
    }

    // ── Exhaustion ──────────────────────────────────────────────────

    /// Once exhausted the iterator stays exhausted; no hidden rewind.
    #[test]
    fn exhausted_iterator_stays_exhausted() {
        let mut iter = PrimeBlockIter::new(0, 10).unwrap();
        assert!(iter.advance().is_some());
        assert!(iter.advance().is_none());
        assert!(iter.advance().is_none());
        assert_eq!(iter.next(), None);
    }

    /// The `Iterator` impl and the explicit step operation see the same
    /// sequence.
    #[test]
    fn iterator_impl_matches_advance() {
        let via_iterator: Vec<u64> = PrimeBlockIter::new(0, 200_000).unwrap().flatten().collect();
        let mut via_advance = Vec::new();
        let mut iter = PrimeBlockIter::new(0, 200_000).unwrap();
        while let Some(batch) = iter.advance() {
            via_advance.extend_from_slice(batch);
        }
        assert_eq!(via_iterator, via_advance);
    }

    // ── Discovery Invariant ─────────────────────────────────────────

    /// A sieving prime discovered on demand never strikes below its own
    /// square: 251 is prime, 251^2 = 63001 sits in block 0, and 251 itself
    /// survives that same block.
    #[test]
    fn discovered_prime_spares_values_below_its_square() {
        let primes = collect_all(0, BLOCK_SIZE - 1);
        assert!(primes.binary_search(&251).is_ok());
        assert!(primes.binary_search(&63_001).is_err()); // 251^2, struck
        // Every sieving prime below isqrt(BLOCK_SIZE) is also in the output.
        for p in [3u64, 5, 7, 11, 13, 251] {
            assert!(primes.binary_search(&p).is_ok(), "{} missing", p);
        }
    }
}
