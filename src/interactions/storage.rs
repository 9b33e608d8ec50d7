//! Key/value persistence seam for interaction state
//!
//! Mirrors the `window.localStorage` surface so the browser implementation
//! is a thin wrapper and tests can use an in-memory map.

use std::cell::RefCell;
use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// No storage backend (private mode, no window)
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected the operation (quota exceeded etc.)
    #[error("storage operation failed: {0}")]
    Backend(String),
}

pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage, used in tests and outside the browser
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
