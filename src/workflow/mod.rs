//! Goal-driven task workflow for the working dataset.
//!
//! A goal selects a fixed catalog of task categories. Tasks run as
//! simulated, cancellable jobs whose completion rewrites the in-memory
//! working dataset through a registry of result strategies. The module
//! follows the same hexagonal split as [`crate::analysis`]:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
