//! Bounded retry with exponential backoff and full jitter
//!
//! The upstream feed drops connections often enough that a single failed GET
//! should not abort a run, but a persistently-down endpoint must not spin
//! forever either. Only transport-level failures (timeout, connect) are
//! retried; HTTP error statuses are left to the response parser.

use rand::Rng;

/// Retry budget for one GET
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the initial try
    pub max_attempts: u32,
    /// Base delay in milliseconds for exponential backoff
    pub base_delay_ms: u64,
    /// Cap on the backoff delay in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 5, base_delay_ms: 200, max_delay_ms: 3000 }
    }
}

impl RetryPolicy {
    /// Backoff delay before retrying `attempt` (1-based), with full jitter:
    /// a random value in `[0, min(max_delay, base_delay * 2^(attempt-1)))`.
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let capped = self.capped_ms(attempt);
        if capped == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..capped)
        }
    }

    /// Exponential delay capped at `max_delay_ms`, before jitter
    fn capped_ms(&self, attempt: u32) -> u64 {
        let exponent = attempt.saturating_sub(1);
        let multiplier = if exponent >= 32 { u64::MAX } else { 1u64 << exponent };
        self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms)
    }

    /// Backoff with caller-supplied jitter, for deterministic tests
    #[cfg(test)]
    pub fn backoff_ms_with_jitter(&self, attempt: u32, jitter_fn: impl Fn(u64) -> u64) -> u64 {
        jitter_fn(self.capped_ms(attempt))
    }
}
