// Record Store - durable keyed collections behind a swappable interface
//
// Workflows re-read the backing collection on every call, so the store is the
// single source of truth. Records are never removed: upsert either appends a
// new id or fully replaces the record carrying that id.

pub mod json;
pub mod memory;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use json::JsonFileStore;
pub use memory::InMemoryStore;

/// The four persisted collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    SupervisionRequests,
    Theses,
    DefenseRequests,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Users,
        Collection::SupervisionRequests,
        Collection::Theses,
        Collection::DefenseRequests,
    ];

    /// File name used by file-backed stores
    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Users => "users.json",
            Collection::SupervisionRequests => "requests.json",
            Collection::Theses => "theses.json",
            Collection::DefenseRequests => "defenses.json",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collection::Users => "users",
            Collection::SupervisionRequests => "supervision-requests",
            Collection::Theses => "theses",
            Collection::DefenseRequests => "defense-requests",
        };
        f.write_str(name)
    }
}

/// A value that lives in exactly one collection and is keyed by a string id
pub trait Record: Serialize + DeserializeOwned + Clone {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error in {collection}: {source}")]
    Serialization {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },

    #[error("Lock acquisition failed for {collection}: {reason}")]
    Lock {
        collection: Collection,
        reason: String,
    },
}

/// Load/find/upsert over typed collections
pub trait RecordStore {
    /// Every record of the collection, in stored order
    fn load_all<R: Record>(&self) -> Result<Vec<R>, StoreError>;

    /// Insert when the id is unseen, otherwise replace the stored record in place
    fn upsert<R: Record>(&self, record: &R) -> Result<(), StoreError>;

    fn find_by_id<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        Ok(self
            .load_all::<R>()?
            .into_iter()
            .find(|record| record.id() == id))
    }
}

impl<T: RecordStore> RecordStore for &T {
    fn load_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        (**self).load_all()
    }

    fn upsert<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        (**self).upsert(record)
    }

    fn find_by_id<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        (**self).find_by_id(id)
    }
}
