//! Datrix: analysis state and goal-driven data-cleaning workflows.
//!
//! This crate keeps the history of analysis runs and the saved analysis
//! models, and drives simulated task workflows that clean a working
//! campaign dataset for a chosen goal.
//!
//! # Architecture
//!
//! Datrix follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and scheduling
//! - **Adapters**: Concrete implementations of ports (memory, filesystem,
//!   tokio timers)
//!
//! # Modules
//!
//! - [`analysis`]: Analysis history, saved models, and the current goal
//! - [`workflow`]: Task catalogs, simulated runs, and the working dataset

pub mod analysis;
pub mod workflow;
