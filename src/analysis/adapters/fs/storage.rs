//! Directory-backed durable storage.
//!
//! Each key is stored as one UTF-8 file inside a capability-scoped
//! directory, so keys can never address paths outside of it.

use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::Arc;

use crate::analysis::ports::{DurableStorage, DurableStorageError, DurableStorageResult};

const TEMP_SUFFIX: &str = ".tmp";

/// Durable storage writing one file per key into a directory.
#[derive(Debug, Clone)]
pub struct FileDurableStorage {
    dir: Arc<Dir>,
}

impl FileDurableStorage {
    /// Opens (creating if needed) the storage directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DurableStorageError::Backend`] when the directory cannot be
    /// created or opened.
    pub fn open(path: &Utf8Path) -> DurableStorageResult<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(DurableStorageError::backend)?;
        let dir =
            Dir::open_ambient_dir(path, ambient_authority()).map_err(DurableStorageError::backend)?;
        Ok(Self::from_dir(dir))
    }

    /// Wraps an already opened directory capability.
    #[must_use]
    pub fn from_dir(dir: Dir) -> Self {
        Self { dir: Arc::new(dir) }
    }
}

/// Maps a storage key onto a file name, rejecting anything path-like.
fn file_name_for(key: &str) -> DurableStorageResult<String> {
    let is_valid = !key.is_empty()
        && !key.starts_with('.')
        && !key.ends_with(TEMP_SUFFIX)
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'));
    if !is_valid {
        return Err(DurableStorageError::InvalidKey(key.to_owned()));
    }
    Ok(key.to_owned())
}

async fn run_blocking<F, T>(f: F) -> DurableStorageResult<T>
where
    F: FnOnce() -> DurableStorageResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| DurableStorageError::backend(io::Error::other(err.to_string())))?
}

#[async_trait]
impl DurableStorage for FileDurableStorage {
    async fn get(&self, key: &str) -> DurableStorageResult<Option<String>> {
        let file_name = file_name_for(key)?;
        let dir = Arc::clone(&self.dir);
        run_blocking(move || match dir.read_to_string(&file_name) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(DurableStorageError::backend(err)),
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> DurableStorageResult<()> {
        let file_name = file_name_for(key)?;
        let contents = value.to_owned();
        let dir = Arc::clone(&self.dir);
        run_blocking(move || {
            let temp_name = format!("{file_name}{TEMP_SUFFIX}");
            dir.write(&temp_name, contents)
                .map_err(DurableStorageError::backend)?;
            dir.rename(&temp_name, &dir, &file_name)
                .map_err(DurableStorageError::backend)
        })
        .await
    }

    async fn remove(&self, key: &str) -> DurableStorageResult<()> {
        let file_name = file_name_for(key)?;
        let dir = Arc::clone(&self.dir);
        run_blocking(move || match dir.remove_file(&file_name) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(DurableStorageError::backend(err)),
        })
        .await
    }
}
