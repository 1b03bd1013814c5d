//! Rate-to-speed mapping
//!
//! Turns the latest [`RateSample`] into a tick interval. Pure: no timers,
//! no sample history, just the most recent window plus static config. The
//! 1.0 multiplier floor is the one hard invariant here - the game never
//! runs slower than its base rate, no matter what the feed reports.

use super::signal::RateSample;
use crate::config::{ConfigError, GameConfig};

/// Normalization from raw window count to speed multiplier.
///
/// Tunable policy, not a correctness rule: observed variants divide by 2,
/// pass the count through, or cap at 7. All are expressible here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePolicy {
    /// Raw count is divided by this
    pub divisor: f32,
    /// Optional ceiling applied after division
    pub cap: Option<f32>,
}

impl RatePolicy {
    /// Multiplier for a raw window count, floored at 1.0
    pub fn multiplier_for(&self, window_event_count: u32) -> f32 {
        let scaled = window_event_count as f32 / self.divisor;
        let capped = match self.cap {
            Some(cap) => scaled.min(cap),
            None => scaled,
        };
        capped.max(1.0)
    }
}

/// Maps the latest rate sample to the interval until the next tick
#[derive(Debug, Clone)]
pub struct SpeedController {
    base_ticks_per_second: f32,
    policy: RatePolicy,
    multiplier: f32,
}

impl SpeedController {
    /// Build from validated configuration.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            base_ticks_per_second: config.base_ticks_per_second,
            policy: config.rate_policy(),
            multiplier: 1.0,
        })
    }

    /// Recompute the multiplier from a fresh window sample. No history is
    /// kept; each sample fully supersedes the previous one.
    pub fn on_rate_sample(&mut self, sample: &RateSample) {
        self.multiplier = self.policy.multiplier_for(sample.window_event_count);
    }

    /// Current speed multiplier, always >= 1.0
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Milliseconds until the next tick should run. Strictly positive,
    /// finite, and never longer than the base interval.
    pub fn tick_interval_ms(&self) -> f32 {
        1000.0 / (self.base_ticks_per_second * self.multiplier)
    }
}
