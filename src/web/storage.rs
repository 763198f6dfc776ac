//! `window.localStorage` backed storage

use crate::persistence::{KeyValueStorage, PersistenceError};

use super::platform_error;

/// Local storage of the current window
///
/// Some browsers refuse access (privacy modes, sandboxed iframes). The editor
/// still works then; reads come back empty and writes fail.
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl LocalStorage {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| match window.local_storage() {
            Ok(storage) => storage,
            Err(e) => {
                log::warn!("localStorage unavailable: {}", platform_error(e));
                None
            }
        });
        Self { storage }
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    fn storage(&self) -> Result<&web_sys::Storage, PersistenceError> {
        self.storage
            .as_ref()
            .ok_or_else(|| PersistenceError::Storage("localStorage unavailable".to_string()))
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn storage_error(e: wasm_bindgen::JsValue) -> PersistenceError {
    PersistenceError::Storage(platform_error(e).to_string())
}

impl KeyValueStorage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match &self.storage {
            Some(storage) => storage.get_item(key).map_err(storage_error),
            None => Ok(None),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.storage()?.set_item(key, value).map_err(storage_error)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.storage()?.remove_item(key).map_err(storage_error)
    }
}
