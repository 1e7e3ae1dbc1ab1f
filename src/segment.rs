//! # Segment — Block State and the Batch Engine
//!
//! The cache-blocking core shared by both enumeration modes. A [`BlockState`]
//! owns one block's odd-only bitmap plus the per-prime carried offsets; the
//! batch engine [`generate_primes_upto`] drives it with seed primes known
//! upfront, while the streaming iterator (`stream` module) drives the same
//! state with primes discovered on demand.
//!
//! ## Algorithm: Segmented Sieve
//!
//! The range is processed in fixed blocks of `BLOCK_SIZE = 2^16` integers —
//! a 4 KiB odd-only bitmap that stays resident in L1 cache across the whole
//! marking pass. For each sieving prime the bitmap index of its next
//! unmarked multiple is carried from block to block: after marking, the
//! overshoot `offset − BLOCK_SIZE/2` is exactly the starting index in the
//! next block, so no division is ever repeated per prime per block.
//!
//! ## Invariants
//!
//! - Bitmap index `i` of a block starting at `B` represents `B + 2i + 1`.
//! - Index 0 of block 0 (the value 1) is forced composite on reset.
//! - A prime is admitted only once its square is reachable by the current
//!   block; its first marked multiple is always exactly `p²`.

use crate::error::SieveError;
use crate::sieve::{self, BlockBitmap, MAX_LIMIT};

/// Integers per block. Large enough to amortize per-block bookkeeping,
/// small enough that the odd-only bitmap fits in L1 cache.
pub const BLOCK_SIZE: u64 = 1 << 16;

/// Odd candidates per block: one bitmap slot each.
pub const ODD_BLOCK_SIZE: u64 = BLOCK_SIZE >> 1;

/// Below this bound the plain odd-only sieve beats segmentation overhead,
/// so the batch engine falls back to it directly.
pub const SEGMENT_THRESHOLD: u64 = 10_000;

/// Reusable per-block sieve state: the odd-only bitmap, the sieving primes
/// admitted so far, and the parallel carried-offset array.
///
/// `primes` and `offsets` are indexed identically — one `admit` pushes both,
/// one `mark` pass mutates both — and primes are appended in increasing
/// order, never removed. The bitmap is reset in place every block; nothing
/// here reallocates after construction.
pub struct BlockState {
    bitmap: BlockBitmap,
    primes: Vec<u64>,
    offsets: Vec<u64>,
    start: u64,
}

impl BlockState {
    /// A fresh state positioned at block 0 with no sieving primes.
    pub fn new() -> Self {
        BlockState {
            bitmap: BlockBitmap::new_all_set(ODD_BLOCK_SIZE as usize),
            primes: Vec::new(),
            offsets: Vec::new(),
            start: 0,
        }
    }

    /// Start of the current block.
    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Inclusive upper bound of the current block.
    #[inline]
    pub fn end(&self) -> u64 {
        self.start + BLOCK_SIZE - 1
    }

    /// The sieving primes admitted so far, in increasing order.
    pub fn sieving_primes(&self) -> &[u64] {
        &self.primes
    }

    /// Register a new sieving prime. Its carried offset starts at the bitmap
    /// index of `p²` relative to the current block start; smaller multiples
    /// of `p` were already struck by smaller primes.
    ///
    /// Callers admit lazily — only once `p² <= self.end()` — which also
    /// guarantees `p² >= self.start()` (every earlier block's bound was
    /// below `p²`, or the prime would have been admitted then).
    pub fn admit(&mut self, p: u64) {
        debug_assert!(p >= 3 && p & 1 == 1, "sieving primes are odd and >= 3");
        let square = p * p;
        debug_assert!(
            square >= self.start,
            "first multiple of an admitted prime must land in or after the current block"
        );
        self.primes.push(p);
        self.offsets.push((square - self.start) >> 1);
    }

    /// Reset the bitmap to all-candidates in place. Block 0 forces index 0
    /// composite: it represents the value 1.
    pub fn reset(&mut self) {
        self.bitmap.set_all();
        if self.start == 0 {
            self.bitmap.clear(0);
        }
    }

    /// Strike composites for every sieving prime, then renormalize each
    /// carried offset for the next block. The subtraction is the whole
    /// block-to-block handoff: `offset − ODD_BLOCK_SIZE` is already the
    /// correct starting index one block later.
    pub fn mark(&mut self) {
        for (&p, offset) in self.primes.iter().zip(self.offsets.iter_mut()) {
            let mut at = *offset;
            while at < ODD_BLOCK_SIZE {
                self.bitmap.clear(at as usize);
                at += p;
            }
            *offset = at - ODD_BLOCK_SIZE;
        }
    }

    /// Append the surviving values in `[low, high]` to `out`, in increasing
    /// order. `low` trims a partially-consumed first block; `high` trims a
    /// block straddling the requested bound.
    pub fn extract_into(&self, low: u64, high: u64, out: &mut Vec<u64>) {
        for i in self.bitmap.iter_set_bits() {
            let value = self.start + 2 * i as u64 + 1;
            if value < low {
                continue;
            }
            if value > high {
                break;
            }
            out.push(value);
        }
    }

    /// Move the cursor to the next block.
    pub fn advance(&mut self) {
        self.start += BLOCK_SIZE;
    }
}

impl Default for BlockState {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate all primes up to `limit` (inclusive), batch mode.
///
/// Seeds the block state with primes up to `isqrt(limit)` and admits each
/// one lazily, exactly on the first block whose upper bound reaches `p²` —
/// admitting earlier would pay marking bookkeeping for primes that cannot
/// strike anything yet. Bounds below [`SEGMENT_THRESHOLD`] skip segmentation
/// entirely.
pub fn generate_primes_upto(limit: u64) -> Result<Vec<u64>, SieveError> {
    if limit > MAX_LIMIT {
        return Err(SieveError::LimitTooLarge { limit });
    }
    if limit < SEGMENT_THRESHOLD {
        return Ok(sieve::small_primes(limit));
    }

    let seeds = sieve::small_primes(sieve::isqrt(limit));
    let mut block = BlockState::new();
    let mut primes = Vec::with_capacity(sieve::estimate_prime_count(limit));
    primes.push(2); // no odd-bitmap slot; emitted exactly once

    let mut next_seed = 1; // seeds[0] == 2 never sieves
    while block.start() <= limit {
        let block_end = block.end();
        while next_seed < seeds.len() {
            let p = seeds[next_seed];
            if p * p > block_end {
                break;
            }
            block.admit(p);
            next_seed += 1;
        }
        block.reset();
        block.mark();
        block.extract_into(0, limit, &mut primes);
        block.advance();
    }
    Ok(primes)
}
