use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

const TABLENAME: &str = "kvstore";
const KEY_FIELD: &str = "key";
const VALUE_FIELD: &str = "value";

#[derive(Error, Debug)]
pub enum KVStoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("JSON (de)serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key/value store held in a single SQLite file.
///
/// Values are opaque byte blobs. The typed [`KVDb::get`] and [`KVDb::set`]
/// helpers store JSON on top of the raw blob interface.
pub struct KVDb {
    path: PathBuf,
    conn: Connection,
}

impl KVDb {
    /// Open (and create if necessary) the store at `path`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();
        // Create directory for DB if it doesn't already exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        log::debug!("Opening key/value store at {}", path.display());
        let conn = Connection::open(&path)?;
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS '{TABLENAME}' (
                {KEY_FIELD} TEXT PRIMARY KEY NOT NULL,
                {VALUE_FIELD} BLOB NOT NULL
                )"
            ),
            [],
        )?;
        Ok(KVDb { path, conn })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self, key: impl AsRef<str>) -> Result<bool, KVStoreError> {
        let found = self
            .conn
            .query_row(
                &format!("SELECT 1 FROM '{TABLENAME}' WHERE {KEY_FIELD} = ?1"),
                [key.as_ref()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn read_all(&self, key: impl AsRef<str>) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.conn
            .query_row(
                &format!("SELECT {VALUE_FIELD} FROM '{TABLENAME}' WHERE {KEY_FIELD} = ?1"),
                [key.as_ref()],
                |r| r.get::<_, Vec<u8>>(0),
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn write_all(&self, key: impl AsRef<str>, value: impl AsRef<[u8]>) -> Result<(), KVStoreError> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "INSERT INTO '{TABLENAME}' ({KEY_FIELD}, {VALUE_FIELD}) values (?1, ?2)
            ON CONFLICT({KEY_FIELD}) DO UPDATE SET {VALUE_FIELD}=?2",
        ))?;
        let res = stmt.execute(params![key.as_ref(), value.as_ref()])?;
        log::trace!("Upserted {} row(s) for key '{}'", res, key.as_ref());
        Ok(())
    }

    /// Delete `key`. Returns whether a value was present.
    pub fn remove(&self, key: impl AsRef<str>) -> Result<bool, KVStoreError> {
        let res = self.conn.execute(
            &format!("DELETE FROM '{TABLENAME}' WHERE {KEY_FIELD} = ?1"),
            [key.as_ref()],
        )?;
        Ok(res > 0)
    }

    pub fn get<T: DeserializeOwned>(&self, key: impl AsRef<str>) -> Result<Option<T>, KVStoreError> {
        self.read_all(key)?
            .map(|v| serde_json::from_slice::<T>(&v))
            .transpose()
            .map_err(Into::into)
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: impl AsRef<str>, value: &T) -> Result<(), KVStoreError> {
        self.write_all(key, serde_json::to_vec(value)?)
    }
}
