//! Token bucket admission primitive.

use std::time::{Duration, Instant};

/// A token bucket that admits at most `capacity` events per refill period,
/// with burst tolerance up to `capacity`.
///
/// The bucket starts full, so an unseen client can burst its entire budget
/// immediately. Tokens refill continuously at `capacity / period`, capped at
/// `capacity`. Callers needing mutual exclusion wrap the bucket in a lock;
/// `&mut self` makes the requirement explicit.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    /// Maximum burst size and refill amount per period
    capacity: u32,
    /// Currently available tokens, fractional during refill
    tokens: f64,
    /// Window over which `capacity` tokens accumulate
    period: Duration,
    /// When tokens were last credited
    last_refill: Instant,
}

impl TokenBucket {
    /// Create a bucket with the default one-minute refill period.
    pub fn new(capacity: u32) -> Self {
        Self::with_period(capacity, Duration::from_secs(60))
    }

    /// Create a bucket that refills `capacity` tokens over `period`.
    pub fn with_period(capacity: u32, period: Duration) -> Self {
        Self::with_period_at(capacity, period, Instant::now())
    }

    /// `with_period` with an explicit creation instant.
    ///
    /// Callers that drive the bucket with injected instants must create it
    /// with the same clock, otherwise the first refill window is measured
    /// from a different origin than the admissions.
    pub fn with_period_at(capacity: u32, period: Duration, now: Instant) -> Self {
        Self {
            capacity,
            tokens: capacity as f64,
            period,
            last_refill: now,
        }
    }

    /// Attempt to consume one token.
    ///
    /// Returns `true` if a token was available and has been spent, `false`
    /// otherwise. Never blocks; a denied call leaves the bucket unchanged
    /// apart from the refill credit.
    pub fn try_acquire(&mut self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    /// `try_acquire` with an explicit clock reading, so tests can drive time.
    pub fn try_acquire_at(&mut self, now: Instant) -> bool {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Maximum burst size this bucket was created with.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill);
        if elapsed.is_zero() {
            return;
        }
        if elapsed >= self.period {
            // A full period restores full capacity exactly; going through
            // the fractional path would lose the boundary to rounding.
            self.tokens = self.capacity as f64;
        } else {
            let credit = self.capacity as f64 * (elapsed.as_secs_f64() / self.period.as_secs_f64());
            self.tokens = (self.tokens + credit).min(self.capacity as f64);
        }
        self.last_refill = now;
    }
}
