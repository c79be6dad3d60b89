//! Advisory request pacing for sequential call loops.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration as StdDuration;

/// Pause after this many sequential calls by default.
pub const DEFAULT_PACE_EVERY: u32 = 10;

/// Default length of the pacing pause.
pub const DEFAULT_PACE_PAUSE: StdDuration = StdDuration::from_secs(1);

/// Cooperative pacing for loops that issue many sequential requests.
///
/// After every `every` calls a fixed pause is inserted. This is deliberate
/// advisory pacing, not a token bucket: the campaign sweep is the only
/// caller, so a simple counter keeps the request rate within upstream
/// throughput limits.
pub struct RequestPacer {
    every: u32,
    pause: StdDuration,
    issued: AtomicU32,
}

impl RequestPacer {
    #[must_use]
    pub fn new(every: u32, pause: StdDuration) -> Self {
        Self {
            every: every.max(1),
            pause,
            issued: AtomicU32::new(0),
        }
    }

    /// Account for one upcoming call, sleeping first when the pause boundary
    /// has been reached.
    pub async fn tick(&self) {
        let prior = self.issued.fetch_add(1, Ordering::Relaxed);
        if prior > 0 && prior % self.every == 0 {
            tokio::time::sleep(self.pause).await;
        }
    }

    /// Calls accounted for so far.
    #[must_use]
    pub fn issued(&self) -> u32 {
        self.issued.load(Ordering::Relaxed)
    }
}

impl Default for RequestPacer {
    fn default() -> Self {
        Self::new(DEFAULT_PACE_EVERY, DEFAULT_PACE_PAUSE)
    }
}
