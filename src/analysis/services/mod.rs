//! Application services for analysis state management.

mod config;
mod store;

pub use config::StoreConfig;
pub use store::{AnalysisStore, AnalysisStoreError, AnalysisStoreResult};
