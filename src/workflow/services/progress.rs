//! Random source for simulated progress.

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::WorkflowConfig;
use crate::workflow::domain::Dataset;

/// Draws progress increments and run durations.
///
/// Seeding the simulator makes every run reproducible.
#[derive(Debug)]
pub struct ProgressSimulator {
    rng: Mutex<StdRng>,
}

impl ProgressSimulator {
    /// Creates a simulator seeded from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Creates a deterministic simulator.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    const fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Draws the next per-tick progress increment.
    #[must_use]
    pub fn next_increment(&self, config: &WorkflowConfig) -> u8 {
        self.with_rng(|rng| rng.random_range(config.increment_range()))
    }

    /// Draws a synthesized run duration.
    #[must_use]
    pub fn next_duration(&self, config: &WorkflowConfig) -> Duration {
        let seconds = self.with_rng(|rng| rng.random_range(config.duration_range()));
        Duration::from_secs(u64::from(seconds))
    }

    /// Generates a random campaign dataset with `rows` rows.
    #[must_use]
    pub fn generate_dataset(&self, rows: u32) -> Dataset {
        self.with_rng(|rng| Dataset::generate(rng, rows))
    }

    // A poisoned generator is still a valid generator.
    fn with_rng<T>(&self, draw: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        draw(&mut rng)
    }
}

impl Default for ProgressSimulator {
    fn default() -> Self {
        Self::from_os_rng()
    }
}
