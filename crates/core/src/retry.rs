//! Retry policy with capped exponential backoff
//!
//! Governs how the upload engine spaces out retries of transient chunk
//! failures. The delay for retry `n` is `base * 2^n`; the shift is capped
//! so the delay never exceeds `base * 2^max_shift` no matter how many
//! transient failures accumulate.

use std::time::Duration;

/// Backoff parameters for transient-failure retries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Cap on the exponent; the delay tops out at `base * 2^max_shift`
    pub max_shift: u32,
}

impl RetryPolicy {
    pub fn new(base_delay: Duration, max_shift: u32) -> Self {
        Self {
            base_delay,
            max_shift,
        }
    }

    /// Backoff delay for the given retry count.
    ///
    /// The count is clamped to `max_shift`, so the sequence is
    /// non-decreasing and bounded.
    pub fn backoff(&self, retries: u32) -> Duration {
        self.base_delay * (1u32 << retries.min(self.max_shift))
    }

    /// Advance the retry counter, saturating at the cap
    pub fn bump(&self, retries: u32) -> u32 {
        (retries + 1).min(self.max_shift)
    }
}

impl Default for RetryPolicy {
    /// One second base, capped at 32 seconds
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_shift: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_from_base() {
        let policy = RetryPolicy::new(Duration::from_millis(100), 5);

        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(2), Duration::from_millis(400));
        assert_eq!(policy.backoff(3), Duration::from_millis(800));
    }

    #[test]
    fn test_backoff_capped_at_base_times_32() {
        let policy = RetryPolicy::default();

        assert_eq!(policy.backoff(5), Duration::from_secs(32));
        assert_eq!(policy.backoff(6), Duration::from_secs(32));
        assert_eq!(policy.backoff(100), Duration::from_secs(32));
    }

    #[test]
    fn test_backoff_non_decreasing() {
        let policy = RetryPolicy::default();
        let mut previous = Duration::ZERO;

        for n in 0..12 {
            let delay = policy.backoff(n);
            assert!(delay >= previous);
            assert!(delay <= policy.base_delay * 32);
            previous = delay;
        }
    }

    #[test]
    fn test_bump_saturates() {
        let policy = RetryPolicy::default();
        let mut retries = 0;

        for _ in 0..10 {
            retries = policy.bump(retries);
            assert!(retries <= 5);
        }
        assert_eq!(retries, 5);
    }
}
