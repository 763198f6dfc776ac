//! Key-value storage
//!
//! The browser implementation (`window.localStorage`) lives in `web::storage`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::PersistenceError;

pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// In-memory storage
///
/// Clones share the same map, so a test can keep a handle while the editor
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
