//! SQLite-backed key-value store.
//!
//! One `kv` table holds every persisted blob: the workout history and the
//! saved timer engine.

use std::path::Path;

use rusqlite::{params, Connection};

use super::KvStore;
use crate::error::StorageError;

pub const DB_FILE_NAME: &str = "intervalo.db";

/// SQLite database used as the application's [`KvStore`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) the database inside `dir`.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the schema
    /// cannot be applied.
    pub fn open_in(dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir).map_err(|e| StorageError::OpenFailed {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;
        let path = dir.join(DB_FILE_NAME);
        let conn = Connection::open(&path).map_err(|e| StorageError::OpenFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if SQLite cannot allocate the database.
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl KvStore for Database {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    fn kv_set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .map_err(|e| StorageError::WriteFailed {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}
