//! Key-value backends
//!
//! A backend is a flat string-to-string map, the shape of browser
//! `localStorage`. The progress store owns the value format; backends only
//! move strings.

mod file;
#[cfg(feature = "wasm")]
mod web;

pub use file::JsonFileBackend;
#[cfg(feature = "wasm")]
pub use web::LocalStorageBackend;

use crate::error::{Result, StorageError};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Durable local key-value store
pub trait KeyValueBackend {
    /// Read the value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; deleting a missing key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;

    /// All keys currently stored
    fn keys(&self) -> Result<Vec<String>>;
}

/// In-memory backend
///
/// Used by tests and as the fallback when no durable store can be opened.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| StorageError::unavailable("memory backend lock poisoned"))
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.items()?.keys().cloned().collect())
    }
}

/// Backend that fails every call
///
/// Stands in for a browser with storage disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

impl KeyValueBackend for UnavailableBackend {
    fn get_item(&self, _key: &str) -> Result<Option<String>> {
        Err(StorageError::unavailable("storage disabled"))
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
        Err(StorageError::unavailable("storage disabled"))
    }

    fn remove_item(&self, _key: &str) -> Result<()> {
        Err(StorageError::unavailable("storage disabled"))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Err(StorageError::unavailable("storage disabled"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_round_trip() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get_item("a").unwrap(), None);

        backend.set_item("a", "1").unwrap();
        backend.set_item("b", "2").unwrap();
        assert_eq!(backend.get_item("a").unwrap().as_deref(), Some("1"));
        assert_eq!(backend.keys().unwrap(), vec!["a", "b"]);

        backend.remove_item("a").unwrap();
        backend.remove_item("missing").unwrap();
        assert_eq!(backend.get_item("a").unwrap(), None);
    }

    #[test]
    fn unavailable_backend_always_fails() {
        let backend = UnavailableBackend;
        assert!(backend.get_item("a").is_err());
        assert!(backend.set_item("a", "1").is_err());
        assert!(backend.keys().is_err());
    }
}
