//! Port contracts for analysis state persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the analysis store.

pub mod storage;

pub use storage::{DurableStorage, DurableStorageError, DurableStorageResult};

#[cfg(test)]
pub use storage::MockDurableStorage;
