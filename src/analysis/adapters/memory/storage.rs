//! In-memory durable storage for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::analysis::ports::{DurableStorage, DurableStorageError, DurableStorageResult};

/// Thread-safe in-memory key-value storage.
///
/// Clones share the same underlying map, so a test can keep a handle while
/// the store owns another and inspect exactly what was persisted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDurableStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryDurableStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-populated with the given entries.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(map)),
        }
    }
}

fn poisoned(err: &impl std::fmt::Display) -> DurableStorageError {
    DurableStorageError::backend(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl DurableStorage for InMemoryDurableStorage {
    async fn get(&self, key: &str) -> DurableStorageResult<Option<String>> {
        let entries = self.entries.read().map_err(|err| poisoned(&err))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> DurableStorageResult<()> {
        let mut entries = self.entries.write().map_err(|err| poisoned(&err))?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> DurableStorageResult<()> {
        let mut entries = self.entries.write().map_err(|err| poisoned(&err))?;
        entries.remove(key);
        Ok(())
    }
}
