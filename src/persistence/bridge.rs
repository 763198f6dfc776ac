//! Persistence bridge
//!
//! Reads and writes the whole document record under a single key. Anything
//! unreadable is reported as absent so the editor falls back to the starter
//! document.

use super::{KeyValueStorage, PersistenceError};
use crate::models::{DocumentRecord, EditorConfig};

pub struct PersistenceBridge<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> PersistenceBridge<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The stored record, `None` when missing or not a valid record
    pub fn load(&self) -> Result<Option<DocumentRecord>, PersistenceError> {
        let raw = match self.storage.get_item(&self.key)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        match DocumentRecord::from_json(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                log::warn!("ignoring stored document under '{}': {}", self.key, e);
                Ok(None)
            }
        }
    }

    /// The stored record, or the configured starter document
    pub fn load_or_default(&self, config: &EditorConfig) -> DocumentRecord {
        match self.load() {
            Ok(Some(record)) => record,
            Ok(None) => config.starter_record(),
            Err(e) => {
                log::warn!("could not read stored document: {}", e);
                config.starter_record()
            }
        }
    }

    /// Overwrite the stored record
    pub fn save(&mut self, record: &DocumentRecord) -> Result<(), PersistenceError> {
        let json = record
            .to_json()
            .map_err(|e| PersistenceError::Encode(e.to_string()))?;
        self.storage.set_item(&self.key, &json)?;
        log::debug!("saved document '{}' ({} bytes)", record.title, json.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_round_trip() {
        let mut bridge = PersistenceBridge::new(MemoryStorage::new(), "doc");
        let record = DocumentRecord::new("T", "<p>x</p>");
        bridge.save(&record).unwrap();

        assert_eq!(bridge.load().unwrap(), Some(record));
        assert_eq!(
            bridge.storage().get_item("doc").unwrap().as_deref(),
            Some(r#"{"title":"T","html":"<p>x</p>"}"#)
        );
    }

    #[test]
    fn test_missing_record_gives_starter() {
        let bridge = PersistenceBridge::new(MemoryStorage::new(), "doc");
        let config = EditorConfig::default();
        assert_eq!(bridge.load().unwrap(), None);
        assert_eq!(bridge.load_or_default(&config), config.starter_record());
    }

    #[test]
    fn test_corrupt_record_counts_as_absent() {
        let mut storage = MemoryStorage::new();
        storage.set_item("doc", r#"{"title": 3}"#).unwrap();
        let bridge = PersistenceBridge::new(storage, "doc");

        assert_eq!(bridge.load().unwrap(), None);
        assert_eq!(
            bridge.load_or_default(&EditorConfig::default()).title,
            "Untitled document"
        );
    }

    /// Storage that fails every call, like localStorage in some privacy modes
    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
            Err(PersistenceError::Storage("denied".to_string()))
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), PersistenceError> {
            Err(PersistenceError::Storage("quota exceeded".to_string()))
        }

        fn remove_item(&mut self, _key: &str) -> Result<(), PersistenceError> {
            Ok(())
        }
    }

    #[test]
    fn test_storage_failures() {
        let mut bridge = PersistenceBridge::new(BrokenStorage, "doc");
        let config = EditorConfig::default();
        assert_eq!(bridge.load_or_default(&config), config.starter_record());
        assert!(bridge.save(&config.starter_record()).is_err());
    }
}
