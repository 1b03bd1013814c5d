//! Transaction-rate aggregation
//!
//! Buckets externally reported events into fixed one-second windows. The
//! aggregator owns nothing but a counter; the wall-clock cadence (the
//! `setInterval` that closes each window) belongs to the driver, so a
//! faster game can never speed up its own measurement.

/// Immutable snapshot of one completed measurement window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSample {
    /// Events observed during the window
    pub window_event_count: u32,
    /// Wall-clock time (ms) the window closed
    pub observed_at: f64,
}

/// Counts discrete feed events within the current window
#[derive(Debug, Default)]
pub struct SignalAggregator {
    count: u32,
}

impl SignalAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one qualifying event. Arrival timing is arbitrary; the
    /// caller is the feed transport, one call per message.
    pub fn record_event(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Events accumulated in the window so far
    pub fn pending_events(&self) -> u32 {
        self.count
    }

    /// Close the current window: emit its snapshot and start counting the
    /// next window from zero.
    pub fn close_window(&mut self, now_ms: f64) -> RateSample {
        let sample = RateSample {
            window_event_count: self.count,
            observed_at: now_ms,
        };
        self.count = 0;
        sample
    }
}
