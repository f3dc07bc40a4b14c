//! Submission pacing.
//!
//! A perfectly regular request cadence is a bot signature. Every delay is
//! multiplied by a random factor in `1 ± spread` so the timing reads like a
//! person working through a list.

use rand::Rng;
use std::time::Duration;

/// Randomized delay around a base duration.
#[derive(Debug, Clone, Copy)]
pub struct Jitter {
    base: Duration,
    spread: f64,
}

impl Jitter {
    /// Create a jitter source. The spread is clamped to `[0, 0.95]`.
    #[must_use]
    pub fn new(base: Duration, spread: f64) -> Self {
        Self {
            base,
            spread: spread.clamp(0.0, 0.95),
        }
    }

    /// One randomized delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        let factor = rand::thread_rng().gen_range(1.0 - self.spread..=1.0 + self.spread);
        self.base.mul_f64(factor)
    }

    /// Sleep for one randomized delay.
    pub async fn pause(&self) {
        tokio::time::sleep(self.delay()).await;
    }
}
