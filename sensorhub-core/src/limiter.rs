//! Network rate limiter
//!
//! One system-wide timestamp gates motion-triggered network jobs. Periodic
//! network jobs bypass it; their period already bounds their rate.

use portable_atomic::{AtomicU64, Ordering};

const NEVER: u64 = u64::MAX;

/// Minimum-interval gate, safe from interrupt context
pub struct RateLimiter {
    min_interval_ms: u32,
    last_ms: AtomicU64,
}

impl RateLimiter {
    /// Create a limiter that has never accepted anything
    pub const fn new(min_interval_ms: u32) -> Self {
        Self {
            min_interval_ms,
            last_ms: AtomicU64::new(NEVER),
        }
    }

    /// Configured minimum interval
    pub fn min_interval_ms(&self) -> u32 {
        self.min_interval_ms
    }

    /// Accept a dispatch at `now_ms` if the interval has elapsed
    ///
    /// Accepting records `now_ms` as the new reference; a rejected attempt
    /// leaves it unchanged.
    pub fn try_acquire(&self, now_ms: u64) -> bool {
        let mut last = self.last_ms.load(Ordering::Acquire);
        loop {
            if last != NEVER && now_ms.saturating_sub(last) < u64::from(self.min_interval_ms) {
                return false;
            }
            match self.last_ms.compare_exchange_weak(
                last,
                now_ms,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(current) => last = current,
            }
        }
    }

    /// Timestamp of the last accepted dispatch
    pub fn last_accepted_ms(&self) -> Option<u64> {
        match self.last_ms.load(Ordering::Acquire) {
            NEVER => None,
            t => Some(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_always_accepted() {
        let l = RateLimiter::new(500);
        assert!(l.last_accepted_ms().is_none());
        assert!(l.try_acquire(0));
        assert_eq!(l.last_accepted_ms(), Some(0));
    }

    #[test]
    fn test_interval() {
        let l = RateLimiter::new(500);
        assert!(l.try_acquire(1000));
        assert!(!l.try_acquire(1010));
        assert!(!l.try_acquire(1499));
        assert!(l.try_acquire(1500));
        assert_eq!(l.last_accepted_ms(), Some(1500));
    }

    #[test]
    fn test_zero_interval_accepts_all() {
        let l = RateLimiter::new(0);
        assert!(l.try_acquire(5));
        assert!(l.try_acquire(5));
    }

    proptest! {
        #[test]
        fn accepted_bounded_by_window(
            min_interval in 1u32..2000,
            gaps in prop::collection::vec(0u64..300, 1..200),
        ) {
            let l = RateLimiter::new(min_interval);
            let mut now = 0u64;
            let mut accepted = 0u64;
            for gap in gaps {
                now += gap;
                if l.try_acquire(now) {
                    accepted += 1;
                }
            }
            let bound = now / u64::from(min_interval) + 1;
            prop_assert!(accepted <= bound, "{} accepted, bound {}", accepted, bound);
        }
    }
}
