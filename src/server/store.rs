//! Document store seam
//!
//! The routes only need insert and equality lookup on one field, which is
//! all a hosted document database is asked for. `MemoryDocumentStore` backs
//! tests and single-instance deployments.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::error::StoreError;

/// A stored record and its generated id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: String,
    pub data: Value,
}

pub trait DocumentStore {
    /// Insert a document, returning its new id
    fn insert(&self, collection: &str, data: Value) -> Result<String, StoreError>;

    /// All documents whose string field `field` equals `value`, in insertion order
    fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredDocument>, StoreError>;

    fn find_one_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        Ok(self.find_by_field(collection, field, value)?.into_iter().next())
    }
}

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, Vec<StoredDocument>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from a snapshot produced by `snapshot`
    pub fn from_snapshot(snapshot: HashMap<String, Vec<StoredDocument>>) -> Self {
        Self {
            collections: Mutex::new(snapshot),
        }
    }

    pub fn snapshot(&self) -> Result<HashMap<String, Vec<StoredDocument>>, StoreError> {
        Ok(self.lock()?.clone())
    }

    pub fn count(&self, collection: &str) -> Result<usize, StoreError> {
        Ok(self.lock()?.get(collection).map_or(0, Vec::len))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<StoredDocument>>>, StoreError> {
        self.collections
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn insert(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        if !data.is_object() {
            return Err(StoreError::Rejected("documents must be JSON objects".to_string()));
        }
        let id = uuid::Uuid::new_v4().to_string();
        self.lock()?
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument { id: id.clone(), data });
        Ok(id)
    }

    fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let collections = self.lock()?;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(documents
            .iter()
            .filter(|doc| doc.data.get(field).and_then(Value::as_str) == Some(value))
            .cloned()
            .collect())
    }
}
