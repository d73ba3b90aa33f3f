//! Request pacing and connection backoff.
//!
//! Two kinds of waits happen in a scrape run. After every successful download the
//! loop sleeps a jittered delay around the base sleep so the server sees an
//! irregular request rate. After a connection failure it sleeps a backoff that
//! doubles with every failure on the same date and carries no jitter.

use rand::Rng;
use std::time::Duration;

/// Lower bound of the pacing delay as a fraction of the base sleep.
pub const PACING_LOW: f64 = 0.8;
/// Upper bound of the pacing delay as a fraction of the base sleep.
pub const PACING_HIGH: f64 = 1.2;

/// Blocks the scrape loop for a while.
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] that waits on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Draws the post-download delay uniformly from `[0.8 * base, 1.2 * base]`.
///
/// Draws beyond [`Duration::MAX`] are clamped to it.
pub fn pacing_delay<R: Rng>(base: Duration, rng: &mut R) -> Duration {
    let base = base.as_secs_f64();
    let low = base * PACING_LOW;
    let high = base * PACING_HIGH;
    let secs = if high <= low {
        low
    } else {
        rng.random_range(low..=high)
    };
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Doubling backoff for one date. Starts at the base sleep; every failure doubles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    current: Duration,
    failures: u32,
}

impl Backoff {
    pub fn new(base: Duration) -> Self {
        Self {
            current: base,
            failures: 0,
        }
    }

    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Records a failure and returns the doubled sleep to wait before the retry.
    pub fn fail(&mut self) -> Duration {
        self.failures += 1;
        self.current = self.current.saturating_mul(2);
        self.current
    }
}
