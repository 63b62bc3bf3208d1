//! Browser `localStorage` backend

use super::KeyValueBackend;
use crate::error::{Result, StorageError};
use wasm_bindgen::JsValue;

/// Backend over `window.localStorage`
pub struct LocalStorageBackend {
    storage: web_sys::Storage,
}

impl LocalStorageBackend {
    /// Open the window's local storage
    ///
    /// Fails when there is no window (workers) or storage is disabled.
    pub fn open() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::unavailable("no window object"))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StorageError::unavailable("localStorage disabled"))?;
        Ok(Self { storage })
    }
}

fn js_error(value: JsValue) -> StorageError {
    StorageError::unavailable(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

impl KeyValueBackend for LocalStorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_error)
    }

    fn keys(&self) -> Result<Vec<String>> {
        let len = self.storage.length().map_err(js_error)?;
        let mut keys = Vec::with_capacity(len as usize);
        for i in 0..len {
            if let Some(key) = self.storage.key(i).map_err(js_error)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
