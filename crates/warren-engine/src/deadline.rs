//! Adaptive tick deadline.

use std::time::Duration;

use crate::config::DeadlineConfig;

/// How long the coordinator waits for worker reports in one tick.
///
/// Grows geometrically while ticks are unhealthy (degraded or stalled)
/// and snaps back to the initial value after a run of healthy ones.
#[derive(Debug)]
pub(crate) struct AdaptiveDeadline {
    current_ms: u64,
    config: DeadlineConfig,
    healthy_streak: u64,
}

impl AdaptiveDeadline {
    pub fn new(config: &DeadlineConfig) -> Self {
        Self {
            current_ms: config.initial_ms,
            config: config.clone(),
            healthy_streak: 0,
        }
    }

    /// Record whether this tick was unhealthy. Returns the deadline for
    /// the next tick in milliseconds.
    pub fn record_tick(&mut self, unhealthy: bool) -> u64 {
        if unhealthy {
            self.healthy_streak = 0;
            let next = (self.current_ms as f64 * self.config.backoff_factor).ceil() as u64;
            self.current_ms = next.min(self.config.cap_ms);
        } else {
            self.healthy_streak += 1;
            if self.healthy_streak >= self.config.decay_ticks {
                self.current_ms = self.config.initial_ms;
            }
        }
        self.current_ms
    }

    pub fn current(&self) -> Duration {
        Duration::from_millis(self.current_ms)
    }

    pub fn current_ms(&self) -> u64 {
        self.current_ms
    }
}
