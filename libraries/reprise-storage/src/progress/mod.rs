//! Per-track progress persistence
//!
//! Each track's [`ProgressRecord`] is stored as a flat JSON object under a key
//! equal to the track name. The hidden set lives under one global key.
//!
//! The store never fails its callers. Any backend or serialization fault is
//! logged and reads as "no record" (or an empty hidden set); writes that fail
//! are dropped.
//!
//! # Example
//!
//! ```rust
//! use reprise_storage::ProgressStore;
//!
//! let store = ProgressStore::in_memory();
//! assert!(store.get("Chapter 1").is_none());
//!
//! store.update("Chapter 1", |record| record.mark_started(1_700_000_000_000));
//! let record = store.get("Chapter 1").unwrap();
//! assert_eq!(record.first_listened, Some(1_700_000_000_000));
//! ```

use crate::backend::{KeyValueBackend, MemoryBackend};
use crate::error::Result;
use reprise_core::{HiddenSet, ProgressRecord};
use std::fmt;
use std::sync::Arc;

/// Key of the global hidden-set entry
pub const HIDDEN_TRACKS_KEY: &str = "hiddenTracks";

/// Synchronous progress store over a [`KeyValueBackend`]
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct ProgressStore {
    backend: Arc<dyn KeyValueBackend>,
}

impl fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressStore").finish_non_exhaustive()
    }
}

impl ProgressStore {
    /// Create a store over `backend`
    pub fn new(backend: impl KeyValueBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Create a store backed by memory only
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Read the record for `name`
    ///
    /// Returns `None` when the track has never been stored or the stored value
    /// cannot be read.
    pub fn get(&self, name: &str) -> Option<ProgressRecord> {
        match self.read(name) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Failed to read progress for '{}': {}", name, e);
                None
            }
        }
    }

    /// Overwrite the record for `name`
    pub fn set(&self, name: &str, record: &ProgressRecord) {
        if let Err(e) = self.write(name, record) {
            tracing::warn!("Failed to save progress for '{}': {}", name, e);
        }
    }

    /// Read-modify-write the record for `name`
    ///
    /// An absent or unreadable record starts from the default. Returns the
    /// record as written.
    pub fn update<F>(&self, name: &str, f: F) -> ProgressRecord
    where
        F: FnOnce(&mut ProgressRecord),
    {
        let mut record = self.get(name).unwrap_or_default();
        f(&mut record);
        self.set(name, &record);
        record
    }

    /// Forget the record for `name`
    pub fn remove(&self, name: &str) {
        if let Err(e) = self.backend.remove_item(name) {
            tracing::warn!("Failed to remove progress for '{}': {}", name, e);
        }
    }

    /// Read the hidden set; empty when absent or unreadable
    pub fn hidden_tracks(&self) -> HiddenSet {
        let read = || -> Result<HiddenSet> {
            match self.backend.get_item(HIDDEN_TRACKS_KEY)? {
                Some(raw) => Ok(serde_json::from_str(&raw)?),
                None => Ok(HiddenSet::new()),
            }
        };

        read().unwrap_or_else(|e| {
            tracing::warn!("Failed to read hidden tracks: {}", e);
            HiddenSet::new()
        })
    }

    /// Overwrite the hidden set
    pub fn set_hidden_tracks(&self, hidden: &HiddenSet) {
        let write = || -> Result<()> {
            let raw = serde_json::to_string(hidden)?;
            self.backend.set_item(HIDDEN_TRACKS_KEY, &raw)
        };

        if let Err(e) = write() {
            tracing::warn!("Failed to save hidden tracks: {}", e);
        }
    }

    /// Names of every stored track record
    pub fn track_names(&self) -> Vec<String> {
        match self.backend.keys() {
            Ok(keys) => keys.into_iter().filter(|k| k != HIDDEN_TRACKS_KEY).collect(),
            Err(e) => {
                tracing::warn!("Failed to list stored tracks: {}", e);
                Vec::new()
            }
        }
    }

    fn read(&self, name: &str) -> Result<Option<ProgressRecord>> {
        match self.backend.get_item(name)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn write(&self, name: &str, record: &ProgressRecord) -> Result<()> {
        let raw = serde_json::to_string(record)?;
        self.backend.set_item(name, &raw)
    }
}
