//! Analysis state management for Datrix.
//!
//! This module owns the analysis history, the saved analysis models, and the
//! currently selected goal. State is rehydrated from durable storage on load,
//! merged with fixed demo records, and written back after every change. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The state service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
