//! # Sieve — Seed Primes and Bitmap Primitives
//!
//! Foundational number-theory infrastructure shared by the batch engine and
//! the streaming iterator. Provides:
//!
//! 1. **Seed-prime generation** (`small_primes`) via an odd-only sieve of
//!    Eratosthenes — one bit per odd candidate, O(n log log n) time.
//! 2. **Trial-division primality** (`trial_is_prime`), used by the streaming
//!    iterator to discover new sieving primes on demand.
//! 3. **Exact integer square root** (`isqrt`), bracketing-verified so a
//!    floating-point rounding error can never shift the seed bound.
//! 4. **`BlockBitmap`** — a packed-u64 bitmap with an O(n/64) all-set reset,
//!    so block buffers are recycled rather than reallocated between passes.
//!
//! ## Odd-only representation
//!
//! Even numbers other than 2 are never prime, so every bitmap in this crate
//! stores only odd candidates, halving both memory and marking work. The
//! value 2 is synthesized by callers as a special case and never has a slot.

/// Largest supported sieve bound.
///
/// Sieving primes never exceed the square root of the bound, so capping the
/// bound at 2^62 keeps `p * p` comfortably inside `u64` for every admissible
/// prime. Bounds above this are rejected at construction time; silent
/// overflow in the offset arithmetic would corrupt results with no
/// observable symptom.
pub const MAX_LIMIT: u64 = 1 << 62;

/// Generate all primes up to `limit` (inclusive) with an odd-only sieve of
/// Eratosthenes.
///
/// Bitmap index `i` represents the odd integer `2i + 3`; marking starts at
/// `p²` because smaller multiples were already struck by smaller primes.
/// Returns an empty vector for `limit < 2`; 2 is included only when
/// `limit >= 2`.
pub fn small_primes(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }
    let mut primes = Vec::with_capacity(estimate_prime_count(limit));
    primes.push(2);
    if limit < 3 {
        return primes;
    }

    // Odd candidates 3, 5, ..., limit (or limit - 1 if limit is even).
    let odd_count = ((limit - 1) / 2) as usize;
    let mut bitmap = BlockBitmap::new_all_set(odd_count);

    let mut p = 3u64;
    while (p as u128) * (p as u128) <= limit as u128 {
        if bitmap.get(((p - 3) / 2) as usize) {
            let mut multiple = p * p;
            while multiple <= limit {
                bitmap.clear(((multiple - 3) / 2) as usize);
                multiple += 2 * p;
            }
        }
        p += 2;
    }

    for i in bitmap.iter_set_bits() {
        primes.push(2 * i as u64 + 3);
    }
    primes
}

/// Trial-division primality check for an odd candidate `n >= 3`.
///
/// `primes` must contain every prime up to `isqrt(n)`, in increasing order.
/// The streaming iterator satisfies this by construction: candidates are
/// tested in increasing order, so all smaller sieving primes are already
/// known when a candidate comes up.
pub fn trial_is_prime(n: u64, primes: &[u64]) -> bool {
    debug_assert!(n >= 3 && n & 1 == 1, "trial division expects odd n >= 3");
    for &p in primes {
        if p * p > n {
            break;
        }
        if n % p == 0 {
            return false;
        }
    }
    true
}

/// Floor of the integer square root of `n`.
///
/// Seeds from the hardware `sqrt`, then brackets exactly: the result `r`
/// always satisfies `r² <= n < (r+1)²`. The correction loops run at most a
/// couple of iterations; they exist because `f64` cannot represent every
/// `u64` and a truncated approximation may land one off in either direction.
pub fn isqrt(n: u64) -> u64 {
    let mut root = (n as f64).sqrt() as u64;
    while root > 0 && (root as u128) * (root as u128) > n as u128 {
        root -= 1;
    }
    while ((root + 1) as u128) * ((root + 1) as u128) <= n as u128 {
        root += 1;
    }
    root
}

/// Estimate the prime count up to `n`, used to pre-size output vectors.
/// Overshoots π(n) slightly (factor 1.3 on the prime number theorem) so
/// collection never reallocates.
pub fn estimate_prime_count(n: u64) -> usize {
    if n < 10 {
        return 4;
    }
    let nf = n as f64;
    (1.3 * nf / nf.ln()) as usize
}

/// Packed bit array over odd candidates.
///
/// 8× memory reduction over `Vec<bool>`: a 2^16 block's odd half drops to
/// 4 KiB, fitting in L1 cache alongside the offset array. Uses hardware
/// `POPCNT` (via `count_ones()`) for O(n/64) survivor counting and
/// `trailing_zeros()` for ascending set-bit iteration.
///
/// Bit layout: bit `i` lives in word `i / 64`, position `i % 64`. A set bit
/// means the candidate has not yet been proven composite.
pub struct BlockBitmap {
    words: Vec<u64>,
    len: usize,
}

impl BlockBitmap {
    /// Create a bitmap of `len` bits, all set (every candidate survives).
    pub fn new_all_set(len: usize) -> Self {
        let num_words = len.div_ceil(64);
        let mut bitmap = BlockBitmap {
            words: vec![0u64; num_words],
            len,
        };
        bitmap.set_all();
        bitmap
    }

    /// Reset every bit to 1, keeping the unused high bits of the last word
    /// clear so they never pollute `count_ones` or iteration. This is the
    /// per-block reset: O(len/64) stores into an already-allocated buffer.
    pub fn set_all(&mut self) {
        self.words.fill(u64::MAX);
        let extra = self.words.len() * 64 - self.len;
        if extra > 0 {
            if let Some(last) = self.words.last_mut() {
                *last >>= extra;
            }
        }
    }

    /// Number of bits in this bitmap.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the bitmap has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get bit `index`; `true` means the candidate survives.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        debug_assert!(
            index < self.len,
            "BlockBitmap index out of bounds: {} >= {}",
            index,
            self.len
        );
        self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Clear bit `index`: the candidate is composite.
    #[inline]
    pub fn clear(&mut self, index: usize) {
        debug_assert!(index < self.len);
        self.words[index / 64] &= !(1u64 << (index % 64));
    }

    /// Count surviving candidates using hardware POPCNT.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate over the indices of all set bits in ascending order.
    pub fn iter_set_bits(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &word)| {
            let base = wi * 64;
            WordBits { word, base }
        })
    }
}

/// Iterator over set bits within a single u64 word.
struct WordBits {
    word: u64,
    base: usize,
}

impl Iterator for WordBits {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.word == 0 {
            return None;
        }
        let tz = self.word.trailing_zeros() as usize;
        self.word &= self.word - 1; // clear lowest set bit
        Some(self.base + tz)
    }
}
