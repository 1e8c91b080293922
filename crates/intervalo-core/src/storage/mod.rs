mod config;
pub mod database;

pub use config::{Config, TickerConfig, TimerDefaults};
pub use database::Database;

use std::collections::HashMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// Returns `~/.config/intervalo[-dev]/` based on INTERVALO_ENV.
///
/// Set INTERVALO_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("INTERVALO_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("intervalo-dev")
    } else {
        base_dir.join("intervalo")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// String key-value persistence.
///
/// The workout history and the saved timer engine each live under one key
/// and are overwritten whole.
pub trait KvStore {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn kv_set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KvStore + ?Sized> KvStore for &mut S {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).kv_get(key)
    }

    fn kv_set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).kv_set(key, value)
    }
}

/// Read and decode the JSON value stored under `key`.
///
/// # Errors
/// Returns the store's read error, or [`StorageError::Malformed`] if the
/// stored text does not decode as `T`.
pub fn read_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KvStore + ?Sized,
{
    let Some(json) = store.kv_get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|e| StorageError::Malformed {
            key: key.to_string(),
            message: e.to_string(),
        })
}

/// Process-local store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KvStore for MemoryStore {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn kv_set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.kv_get("k").unwrap().is_none());
        store.kv_set("k", "v1").unwrap();
        store.kv_set("k", "v2").unwrap();
        assert_eq!(store.kv_get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn borrowed_store_writes_through() {
        fn write<S: KvStore>(mut store: S) {
            store.kv_set("k", "v").unwrap();
        }

        let mut store = MemoryStore::new();
        write(&mut store);
        assert_eq!(store.kv_get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn read_json_decodes_or_reports_malformed() {
        let store = MemoryStore::with_entry("nums", "[1,2,3]");
        let nums: Option<Vec<u32>> = read_json(&store, "nums").unwrap();
        assert_eq!(nums, Some(vec![1, 2, 3]));

        let missing: Option<Vec<u32>> = read_json(&store, "other").unwrap();
        assert!(missing.is_none());

        let store = MemoryStore::with_entry("nums", "{not json");
        let err = read_json::<Vec<u32>, _>(&store, "nums").unwrap_err();
        assert!(matches!(err, StorageError::Malformed { ref key, .. } if key == "nums"));
        assert!(err.to_string().starts_with("Malformed data under 'nums'"));
    }
}
