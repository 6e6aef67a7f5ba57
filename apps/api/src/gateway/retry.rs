use std::time::Duration;

use rand::Rng;

/// Bounded retry with exponential backoff and "equal jitter".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Never less than 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Upper bound of the sleep after failed attempt `attempt` (1-based):
    /// min(base × 2^(attempt−1), max).
    pub fn ceiling(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }

    /// Sleep before the attempt following failed attempt `attempt`: half the
    /// ceiling plus a uniform jitter in [0, ceiling/2].
    pub fn backoff(&self, attempt: u32) -> Duration {
        let half_ms = (self.ceiling(attempt).as_millis() / 2) as u64;
        let jitter_ms = rand::thread_rng().gen_range(0..=half_ms);
        Duration::from_millis(half_ms + jitter_ms)
    }
}
