//! # Error — Construction-Time Failures
//!
//! Everything that can go wrong is detected synchronously at construction,
//! before any sieving begins; there are no partial results on error and no
//! recoverable failure inside the marking loop (a violated internal
//! invariant there is a logic fault and panics via `debug_assert`).

use std::fmt;

use crate::sieve::MAX_LIMIT;

/// Errors returned when setting up a sieve run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SieveError {
    /// The requested range has `last < first`.
    InvalidRange {
        /// Inclusive lower bound of the request.
        first: u64,
        /// Inclusive upper bound of the request.
        last: u64,
    },
    /// The requested bound exceeds [`MAX_LIMIT`], beyond which the square of
    /// a sieving prime could overflow the offset arithmetic.
    LimitTooLarge {
        /// The requested bound.
        limit: u64,
    },
}

impl fmt::Display for SieveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SieveError::InvalidRange { first, last } => write!(
                f,
                "invalid range: last ({}) is smaller than first ({})",
                last, first
            ),
            SieveError::LimitTooLarge { limit } => write!(
                f,
                "requested bound {} exceeds the supported maximum {}",
                limit, MAX_LIMIT
            ),
        }
    }
}

impl std::error::Error for SieveError {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Display output names both bounds so a CLI user can see what they
    /// passed without re-running with logging enabled.
    #[test]
    fn display_includes_bounds() {
        let err = SieveError::InvalidRange { first: 10, last: 3 };
        let msg = err.to_string();
        assert!(msg.contains("10") && msg.contains('3'), "got: {}", msg);

        let err = SieveError::LimitTooLarge { limit: u64::MAX };
        let msg = err.to_string();
        assert!(msg.contains(&u64::MAX.to_string()), "got: {}", msg);
    }
}
