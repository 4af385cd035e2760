//! Interval and immediate implementations of [`ProgressTicker`].

use async_trait::async_trait;
use std::time::Duration;

use crate::workflow::ports::ProgressTicker;

/// Ticks once per fixed interval using the tokio timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTicker {
    period: Duration,
}

impl IntervalTicker {
    /// Creates a ticker that waits `period` before each tick.
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Returns the wait between ticks.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }
}

#[async_trait]
impl ProgressTicker for IntervalTicker {
    async fn tick(&self) {
        tokio::time::sleep(self.period).await;
    }
}

/// Ticks as soon as the runtime polls it again.
///
/// Runs complete without real time passing, while still yielding to the
/// scheduler so cancellation can interleave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImmediateTicker;

#[async_trait]
impl ProgressTicker for ImmediateTicker {
    async fn tick(&self) {
        tokio::task::yield_now().await;
    }
}
