//! Exponential backoff schedule for provider probes.

use parking_lot::Mutex;
use std::time::Duration;

/// Doubling backoff, starting at `base` and capped at `max`
///
/// Meant to back `Provider::backoff_duration`, which takes `&self`, so the
/// attempt counter lives behind a lock.
#[derive(Debug)]
pub struct ExponentialBackoff {
    base: Duration,
    max: Duration,
    attempt: Mutex<u32>,
}

impl ExponentialBackoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max: max.max(base),
            attempt: Mutex::new(0),
        }
    }

    /// Return the current delay and advance the schedule
    pub fn next(&self) -> Duration {
        let mut attempt = self.attempt.lock();
        let factor = 2u32.saturating_pow(*attempt);
        *attempt = attempt.saturating_add(1);
        self.base.saturating_mul(factor).min(self.max)
    }

    /// Number of delays handed out so far
    pub fn attempts(&self) -> u32 {
        *self.attempt.lock()
    }

    pub fn reset(&self) {
        *self.attempt.lock() = 0;
    }
}
