//! Durable key-value storage port.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for durable storage operations.
pub type DurableStorageResult<T> = Result<T, DurableStorageError>;

/// String-valued key-value persistence contract.
///
/// Values are opaque to the storage: the analysis store serializes
/// collections to JSON before writing them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DurableStorage: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// Returns `None` when the key is absent.
    async fn get(&self, key: &str) -> DurableStorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> DurableStorageResult<()>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> DurableStorageResult<()>;
}

/// Errors returned by durable storage implementations.
#[derive(Debug, Clone, Error)]
pub enum DurableStorageError {
    /// The key cannot be mapped onto the backing store.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    /// Backend failure.
    #[error("storage backend error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl DurableStorageError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
