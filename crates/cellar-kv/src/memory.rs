//! In-memory state store.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};

use crate::{KvError, KvStore};

/// State store holding documents in memory.
///
/// Used by tests and by ephemeral sessions that opt out of persistence.
/// Documents are still stored as serialized JSON so the round-trip
/// behaves exactly like the file backend.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a key with raw bytes, bypassing serialization.
    ///
    /// Lets tests stage unreadable state the way a corrupted document
    /// on disk would look.
    pub fn seed_raw(&self, key: &str, bytes: impl Into<Vec<u8>>) {
        self.lock().insert(key.to_string(), bytes.into());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KvStore for MemoryStore {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KvError> {
        match self.lock().get(key) {
            Some(bytes) => {
                let value = serde_json::from_slice(bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), KvError> {
        let bytes = serde_json::to_vec(value)?;
        self.lock().insert(key.to_string(), bytes);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KvError> {
        self.lock().remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, KvError> {
        Ok(self.lock().contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let store = MemoryStore::new();
        store.set("cart:state", &vec![1_i64, 2, 3]).unwrap();

        let value: Option<Vec<i64>> = store.get("cart:state").unwrap();
        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_missing_key_reads_as_none() {
        let store = MemoryStore::new();
        let value: Option<i64> = store.get("absent").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_seeded_garbage_is_a_serialization_error() {
        let store = MemoryStore::new();
        store.seed_raw("cart:state", &b"\xff\xfe not json"[..]);

        let result: Result<Option<i64>, KvError> = store.get("cart:state");
        assert!(matches!(result, Err(KvError::Serialize(_))));
    }

    #[test]
    fn test_delete_removes_document() {
        let store = MemoryStore::new();
        store.set("k", &7_i64).unwrap();
        store.delete("k").unwrap();

        assert!(!store.exists("k").unwrap());
    }
}
