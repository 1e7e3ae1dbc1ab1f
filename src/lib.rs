//! # primestream — Segmented Prime Sieve with a Streaming Block Iterator
//!
//! Enumerates primes below very large bounds with a cache-blocking
//! segmented sieve of Eratosthenes, in two modes:
//!
//! - **Batch** ([`segment::generate_primes_upto`]): the bound is known
//!   upfront; seed primes up to its square root are sieved first and
//!   admitted lazily as blocks progress.
//! - **Streaming** ([`stream::PrimeBlockIter`]): primes in an inclusive
//!   range `[first, last]`, produced lazily one block-sized batch at a
//!   time, with sieving primes discovered on demand by trial division —
//!   no upfront seed sieve at all.
//!
//! Both modes share the same per-block engine ([`segment::BlockState`]):
//! an odd-only bitmap recycled across blocks and a carried-offset array
//! that propagates each sieving prime's next multiple from block to block
//! without repeated division.

pub mod error;
pub mod progress;
pub mod segment;
pub mod sieve;
pub mod stream;

pub use error::SieveError;
