//! In-memory adapters for analysis state tests and ephemeral sessions.

mod storage;

pub use storage::InMemoryDurableStorage;
