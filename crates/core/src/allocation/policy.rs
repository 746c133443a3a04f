//! Retry policy for identifier allocation.

use std::time::Duration;

use rand::Rng;

/// Tunable parameters for the allocate-and-create retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Lower bound of the randomized pause between attempts.
    pub backoff_min: Duration,
    /// Upper bound of the randomized pause between attempts.
    pub backoff_max: Duration,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_min: Duration::from_millis(200),
            backoff_max: Duration::from_millis(500),
        }
    }
}

impl AllocationPolicy {
    /// A policy that never sleeps between attempts.
    pub fn without_backoff(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff_min: Duration::ZERO,
            backoff_max: Duration::ZERO,
        }
    }

    /// Attempt budget, never below one.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Pick a pause uniformly from `[backoff_min, backoff_max]`.
    ///
    /// Colliding callers pick different pauses, so their next reads land at
    /// different times. A reversed range collapses to `backoff_min`.
    pub fn jittered_backoff(&self) -> Duration {
        if self.backoff_max <= self.backoff_min {
            return self.backoff_min;
        }
        let min_ms = self.backoff_min.as_millis() as u64;
        let max_ms = self.backoff_max.as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
    }
}
