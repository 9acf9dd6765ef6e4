//! Whole-collection persistence over a single JSON file.
//!
//! The file holds one JSON array. Every load reads the whole array and every save
//! replaces it, so the file is always the single source of truth. Access is
//! serialized by a mutex owned by the store instance.

use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub mod error;

pub use error::{Result, StoreError};

/// A JSON-array file holding a collection of `T`.
///
/// `load` and `save` never overlap. `transaction` holds the lock across a full
/// load, mutate, save sequence so concurrent writers cannot lose each other's
/// changes.
pub struct JsonFileStore<T> {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a store for `path`. Nothing touches the filesystem until the
    /// first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
            _marker: PhantomData,
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the entire collection. A missing or blank file is an empty collection.
    pub async fn load(&self) -> Result<Vec<T>> {
        let _guard = self.lock.lock().await;
        self.read_locked().await
    }

    /// Replace the entire collection with `items`.
    pub async fn save(&self, items: &[T]) -> Result<()> {
        let guard = Arc::clone(&self.lock).lock_owned().await;
        self.write_locked(items, guard).await
    }

    /// Run `f` against a freshly loaded collection and persist the result.
    ///
    /// The lock is held for the whole sequence. When `f` returns an error the
    /// file is left untouched and the error is handed back to the caller.
    pub async fn transaction<R, E, F>(&self, f: F) -> std::result::Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> std::result::Result<R, E>,
        E: From<StoreError>,
    {
        let guard = Arc::clone(&self.lock).lock_owned().await;
        let mut items = self.read_locked().await?;
        let value = f(&mut items)?;
        self.write_locked(&items, guard).await?;
        Ok(value)
    }

    async fn read_locked(&self) -> Result<Vec<T>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "store file missing, using empty collection");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    // The guard moves into the blocking task, so the lock is only released once
    // the file is fully replaced, even if the caller's future is dropped midway.
    async fn write_locked(&self, items: &[T], guard: OwnedMutexGuard<()>) -> Result<()> {
        let mut bytes = serde_json::to_vec_pretty(items).map_err(StoreError::Encode)?;
        bytes.push(b'\n');

        let path = self.path.clone();
        let staging = self.staging_path();
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            replace_file(&path, &staging, &bytes)
        })
        .await
        .unwrap_or_else(|join| Err(std::io::Error::other(join)))
        .map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), count = items.len(), "store file written");
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

// The new content lands in a sibling file first and is renamed over the
// target, so the target is always either the old or the new collection.
fn replace_file(path: &Path, staging: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::File::create(staging)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    std::fs::rename(staging, path)
}

impl<T> std::fmt::Debug for JsonFileStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
