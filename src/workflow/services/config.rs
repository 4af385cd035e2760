//! Configuration for simulated task execution.

use serde::Deserialize;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Timing and randomness bounds for simulated task runs.
///
/// # Examples
///
/// ```
/// use datrix::workflow::services::WorkflowConfig;
/// use std::time::Duration;
///
/// let config = WorkflowConfig::default();
/// assert_eq!(config.tick_interval(), Duration::from_millis(500));
/// assert_eq!(config.increment_range(), 10..=30);
///
/// let fast = WorkflowConfig::fast();
/// assert!(fast.tick_interval() < config.tick_interval());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Wait between progress ticks, in milliseconds.
    pub tick_interval_ms: u64,
    /// Smallest progress increment per tick, in percentage points.
    pub min_increment: u8,
    /// Largest progress increment per tick, in percentage points.
    pub max_increment: u8,
    /// Shortest synthesized run duration, in seconds.
    pub min_duration_secs: u8,
    /// Longest synthesized run duration, in seconds.
    pub max_duration_secs: u8,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 500,
            min_increment: 10,
            max_increment: 30,
            min_duration_secs: 2,
            max_duration_secs: 6,
        }
    }
}

impl WorkflowConfig {
    /// Creates a configuration with a short tick interval.
    ///
    /// Useful for demos and tests that use a real timer.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            tick_interval_ms: 20,
            ..Default::default()
        }
    }

    /// Returns the wait between progress ticks.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Returns the inclusive increment bounds.
    ///
    /// Every tick advances by at least one point, and an inverted pair
    /// collapses to the minimum.
    #[must_use]
    pub fn increment_range(&self) -> RangeInclusive<u8> {
        let min = self.min_increment.max(1);
        min..=self.max_increment.max(min)
    }

    /// Returns the inclusive duration bounds in seconds.
    ///
    /// An inverted pair collapses to the minimum.
    #[must_use]
    pub fn duration_range(&self) -> RangeInclusive<u8> {
        self.min_duration_secs..=self.max_duration_secs.max(self.min_duration_secs)
    }
}
