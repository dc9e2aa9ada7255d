use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use super::{Collection, Record, RecordStore, StoreError};

/// In-process store holding each record as its serialized JSON value
///
/// Going through serde keeps the round-trip semantics identical to the file
/// store, so tests against this store exercise the persisted representation.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RefCell<HashMap<Collection, Vec<(String, Value)>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records in a collection
    pub fn len(&self, collection: Collection) -> usize {
        self.collections
            .borrow()
            .get(&collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }
}

impl RecordStore for InMemoryStore {
    fn load_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let collections = self.collections.borrow();
        let Some(entries) = collections.get(&R::COLLECTION) else {
            return Ok(Vec::new());
        };

        entries
            .iter()
            .map(|(_, value)| {
                serde_json::from_value(value.clone()).map_err(|source| StoreError::Serialization {
                    collection: R::COLLECTION,
                    source,
                })
            })
            .collect()
    }

    fn upsert<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        let value = serde_json::to_value(record).map_err(|source| StoreError::Serialization {
            collection: R::COLLECTION,
            source,
        })?;

        let mut collections = self.collections.borrow_mut();
        let entries = collections.entry(R::COLLECTION).or_default();
        match entries.iter_mut().find(|(id, _)| id == record.id()) {
            Some(entry) => entry.1 = value,
            None => entries.push((record.id().to_string(), value)),
        }
        Ok(())
    }
}
