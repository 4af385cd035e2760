//! Port contracts for workflow scheduling.
//!
//! Ports define infrastructure-agnostic interfaces used by the workflow
//! engine.

pub mod ticker;

pub use ticker::ProgressTicker;

#[cfg(test)]
pub use ticker::MockProgressTicker;
