//! Frame timing for the match driver

use std::time::{Duration, Instant};

/// Default driver frame rate
pub const DEFAULT_TICK_RATE: u32 = 60;
/// Default number of ticks per broadcast snapshot
pub const DEFAULT_SNAPSHOT_EVERY: u32 = 1;
/// Highest frame rate the driver accepts
pub const MAX_TICK_RATE: u32 = 1_000;

/// Interval between driver ticks at `tick_rate` frames per second.
/// The rate is clamped to `1..=MAX_TICK_RATE`, so the period is never zero.
pub fn tick_interval(tick_rate: u32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(tick_rate.clamp(1, MAX_TICK_RATE)))
}

/// Measures wall-clock time between frames
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous lap (or since creation)
    pub fn lap(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }

}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
