//! Filesystem adapters for analysis state persistence.

mod storage;

pub use storage::FileDurableStorage;
