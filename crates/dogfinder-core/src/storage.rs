//! Persistence port for browser-style key/value storage.
//!
//! Two scopes are used by the app: a durable store (search filters) and a
//! session store (favorites and auth flags). Both are plain string maps; JSON
//! encoding happens in the helpers below so adapters stay trivial.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised while writing to a key/value store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The value could not be encoded as JSON.
    #[error("failed to encode value for '{key}': {detail}")]
    Encode {
        /// Storage key being written.
        key: String,
        /// Encoder message.
        detail: String,
    },
    /// The backing store rejected the write (quota, private mode, I/O).
    #[error("failed to write '{key}': {detail}")]
    Write {
        /// Storage key being written.
        key: String,
        /// Backend message.
        detail: String,
    },
}

/// Raw string key/value storage.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] when the backend rejects the write.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; missing keys are ignored.
    fn remove(&self, key: &str);
}

/// Cheap, cloneable handle to a shared [`KeyValueStore`].
///
/// Equality is identity so handles can live inside `PartialEq` state.
#[derive(Clone)]
pub struct StorageHandle(Rc<dyn KeyValueStore>);

impl StorageHandle {
    /// Wrap a store implementation.
    #[must_use]
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self(Rc::new(store))
    }

    /// Fresh in-memory store.
    #[must_use]
    pub fn memory() -> Self {
        Self::new(MemoryStore::default())
    }

    /// Read a raw string value.
    #[must_use]
    pub fn read(&self, key: &str) -> Option<String> {
        self.0.read(key)
    }

    /// Write a raw string value.
    ///
    /// # Errors
    ///
    /// Propagates the backend's [`StorageError`].
    pub fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.0.write(key, value)
    }

    /// Remove a key.
    pub fn remove(&self, key: &str) {
        self.0.remove(key);
    }

    /// Decode the JSON value under `key`; absent or malformed values yield `None`.
    #[must_use]
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "ignoring unreadable stored value");
                None
            }
        }
    }

    /// Encode `value` as JSON under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Encode`] or the backend's write error.
    pub fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(value).map_err(|err| StorageError::Encode {
            key: key.to_string(),
            detail: err.to_string(),
        })?;
        self.write(key, &encoded)
    }

    /// Like [`Self::save_json`] but logs instead of failing.
    ///
    /// In-memory state stays authoritative when storage is unavailable.
    pub fn persist_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(err) = self.save_json(key, value) {
            tracing::warn!(key, error = %err, "failed to persist state");
        }
    }

    /// Write a raw value, logging failures.
    pub fn persist_raw(&self, key: &str, value: &str) {
        if let Err(err) = self.write(key, value) {
            tracing::warn!(key, error = %err, "failed to persist state");
        }
    }
}

impl PartialEq for StorageHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for StorageHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("StorageHandle(..)")
    }
}

/// In-memory [`KeyValueStore`] used by tests and headless drivers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Snapshot of every stored entry.
    #[must_use]
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries.borrow().clone()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}
