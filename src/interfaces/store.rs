use std::path::Path;

use kvstore::{KVDb, KVStoreError};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store not mounted: {0}")]
    Unmounted(String),
    #[error(transparent)]
    Backend(#[from] KVStoreError),
}

/// Non-volatile key/value storage surviving deep suspend.
pub trait PersistentStore {
    fn exists(&self, key: &str) -> Result<bool, StoreError>;
    fn read_all(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn write_all(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// [`PersistentStore`] over the SQLite-backed [`KVDb`].
///
/// A failed mount is remembered rather than raised, so a node with broken
/// storage still boots and every operation reports [`StoreError::Unmounted`].
pub struct KvsStore {
    db: Result<KVDb, String>,
}

impl KvsStore {
    pub fn mount(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let db = KVDb::new(path).map_err(|e| {
            log::error!("Failed to mount store at {}: {}", path.display(), e);
            format!("{}: {}", path.display(), e)
        });
        if let Ok(db) = &db {
            log::debug!("Mounted store at {}", db.path().display());
        }
        KvsStore { db }
    }

    pub fn is_mounted(&self) -> bool {
        self.db.is_ok()
    }

    fn db(&self) -> Result<&KVDb, StoreError> {
        self.db
            .as_ref()
            .map_err(|reason| StoreError::Unmounted(reason.clone()))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        Ok(self.db()?.get(key)?)
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        Ok(self.db()?.set(key, value)?)
    }

    pub fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        Ok(self.db()?.remove(key)?)
    }
}

impl PersistentStore for KvsStore {
    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.db()?.exists(key)?)
    }

    fn read_all(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db()?.read_all(key)?)
    }

    fn write_all(&mut self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        Ok(self.db()?.write_all(key, bytes)?)
    }
}
