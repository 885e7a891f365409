//! Device-local key-value state storage for Cellar.
//!
//! Provides a simple, ergonomic API for persisting state documents with
//! automatic JSON serialization. State survives process restarts but is
//! local to the device; there is no replication or sync.
//!
//! # Example
//!
//! ```rust,ignore
//! use cellar_kv::{FileStore, KvStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct CartState {
//!     items: Vec<CartLineItem>,
//! }
//!
//! let store = FileStore::open("/var/lib/cellar")?;
//!
//! // Persist a document
//! store.set("cart:state", &state)?;
//!
//! // Read it back
//! let state: Option<CartState> = store.get("cart:state")?;
//! ```

mod error;
mod file;
mod memory;

pub use error::KvError;
pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{de::DeserializeOwned, Serialize};

/// Typed key-value state store.
///
/// Implementations persist one JSON document per key. A missing key
/// reads as `None`; unreadable contents surface as a serialization
/// error so callers can decide how to recover.
pub trait KvStore {
    /// Get a document by key.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KvError>;

    /// Set a document, replacing any previous value for the key.
    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), KvError>;

    /// Delete the document for a key. Deleting a missing key is not an
    /// error.
    fn delete(&self, key: &str) -> Result<(), KvError>;

    /// Check whether a key holds a document.
    fn exists(&self, key: &str) -> Result<bool, KvError>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KvError> {
        (**self).get(key)
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), KvError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), KvError> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> Result<bool, KvError> {
        (**self).exists(key)
    }
}

impl<S: KvStore + ?Sized> KvStore for std::sync::Arc<S> {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KvError> {
        (**self).get(key)
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), KvError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), KvError> {
        (**self).delete(key)
    }

    fn exists(&self, key: &str) -> Result<bool, KvError> {
        (**self).exists(key)
    }
}
