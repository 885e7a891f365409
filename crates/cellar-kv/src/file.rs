//! File-backed state store.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};

use crate::{KvError, KvStore};

/// State store keeping one JSON document per key under a root directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write leaves the previous document intact rather than a
/// truncated one.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at the given directory, creating it if needed.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let store = FileStore::open("/var/lib/cellar")?;
    /// ```
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, KvError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| KvError::Open(e.to_string()))?;
        Ok(Self { root })
    }

    /// Root directory the documents live under.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys carry namespace separators; file names stay flat.
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{name}.json"))
    }
}

impl KvStore for FileStore {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KvError> {
        let bytes = match fs::read(self.path_for(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(KvError::Read(e.to_string())),
        };
        let value = serde_json::from_slice(&bytes)?;
        Ok(Some(value))
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), KvError> {
        let bytes = serde_json::to_vec(value)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).map_err(|e| KvError::Write(e.to_string()))?;
        fs::rename(&tmp, &path).map_err(|e| KvError::Write(e.to_string()))
    }

    fn delete(&self, key: &str) -> Result<(), KvError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(KvError::Write(e.to_string())),
        }
    }

    fn exists(&self, key: &str) -> Result<bool, KvError> {
        Ok(self.path_for(key).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        let value: Option<Vec<String>> = store.get("cart:state").unwrap();
        assert!(value.is_none());
        assert!(!store.exists("cart:state").unwrap());
    }

    #[test]
    fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store
            .set("cart:state", &vec!["riesling".to_string()])
            .unwrap();

        let value: Option<Vec<String>> = store.get("cart:state").unwrap();
        assert_eq!(value, Some(vec!["riesling".to_string()]));
        assert!(store.exists("cart:state").unwrap());
    }

    #[test]
    fn test_set_replaces_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("counter", &1_i64).unwrap();
        store.set("counter", &2_i64).unwrap();

        let value: Option<i64> = store.get("counter").unwrap();
        assert_eq!(value, Some(2));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("counter", &1_i64).unwrap();
        store.delete("counter").unwrap();
        store.delete("counter").unwrap();

        assert!(!store.exists("counter").unwrap());
    }

    #[test]
    fn test_corrupt_document_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        fs::write(dir.path().join("counter.json"), b"{not json").unwrap();

        let result: Result<Option<i64>, KvError> = store.get("counter");
        assert!(matches!(result, Err(KvError::Serialize(_))));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("cart:state", &42_i64).unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "tmp").unwrap_or(false))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_keys_with_separators_survive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("cart:state", &"a".to_string()).unwrap();
        store.set("wishlist:state", &"b".to_string()).unwrap();

        let a: Option<String> = store.get("cart:state").unwrap();
        let b: Option<String> = store.get("wishlist:state").unwrap();
        assert_eq!(a.as_deref(), Some("a"));
        assert_eq!(b.as_deref(), Some("b"));
    }
}
