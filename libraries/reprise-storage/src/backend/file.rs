//! JSON file backend
//!
//! Keeps the whole map in memory and rewrites one JSON document on every
//! write. Writes go to a sibling temp file that is then renamed over the
//! original, so a crash mid-write leaves the previous document intact.

use super::KeyValueBackend;
use crate::error::{Result, StorageError};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Durable backend stored as a single JSON object on disk
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl JsonFileBackend {
    /// Open (or lazily create) the document at `path`
    ///
    /// A missing file is treated as an empty store. A file that is not a JSON
    /// object of strings is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Opened progress file {} ({} keys)", path.display(), items.len());

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    /// Location of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn items(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| StorageError::unavailable("file backend lock poisoned"))
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(items)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueBackend for JsonFileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items()?;
        let previous = items.insert(key.to_string(), value.to_string());
        if let Err(e) = self.flush(&items) {
            // Keep memory in step with disk
            match previous {
                Some(prev) => items.insert(key.to_string(), prev),
                None => items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items()?;
        if let Some(previous) = items.remove(key) {
            if let Err(e) = self.flush(&items) {
                items.insert(key.to_string(), previous);
                return Err(e);
            }
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.items()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonFileBackend::open(dir.path().join("progress.json")).unwrap();
        assert!(backend.keys().unwrap().is_empty());
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("progress.json");

        let backend = JsonFileBackend::open(&path).unwrap();
        backend.set_item("song", r#"{"currentTime":12.0}"#).unwrap();
        backend.set_item("other", "x").unwrap();
        backend.remove_item("other").unwrap();
        drop(backend);

        let reopened = JsonFileBackend::open(&path).unwrap();
        assert_eq!(
            reopened.get_item("song").unwrap().as_deref(),
            Some(r#"{"currentTime":12.0}"#)
        );
        assert_eq!(reopened.get_item("other").unwrap(), None);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            JsonFileBackend::open(&path),
            Err(StorageError::Serialization(_))
        ));
    }
}
