use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fd_lock::RwLock;
use serde_json::Value;
use tracing::debug;

use super::{Collection, Record, RecordStore, StoreError};

/// File system implementation of the record store
///
/// Each collection is one pretty-printed JSON array. Writers hold an exclusive
/// lock on a sibling `.lock` file for the whole read-modify-write and publish
/// the new array with a rename, so an upsert is all-or-nothing on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Create an empty array file for every collection that has none yet
    pub fn ensure_collections(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            let path = self.collection_path(collection);
            if !path.exists() {
                fs::write(&path, b"[]")?;
                debug!(collection = %collection, path = %path.display(), "Created empty collection");
            }
        }
        Ok(())
    }

    fn collection_path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    fn lock_path(&self, collection: Collection) -> PathBuf {
        self.data_dir
            .join(format!("{}.lock", collection.file_name()))
    }

    fn open_lock(&self, collection: Collection) -> Result<RwLock<File>, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(self.lock_path(collection))?;
        Ok(RwLock::new(file))
    }

    fn read_values(&self, collection: Collection) -> Result<Vec<Value>, StoreError> {
        let path = self.collection_path(collection);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&contents)
            .map_err(|source| StoreError::Serialization { collection, source })
    }

    fn write_values(&self, collection: Collection, values: &[Value]) -> Result<(), StoreError> {
        let path = self.collection_path(collection);
        let tmp_path = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(values)
            .map_err(|source| StoreError::Serialization { collection, source })?;

        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(&bytes)?;
        tmp.sync_all()?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn load_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        let lock = self.open_lock(R::COLLECTION)?;
        let _guard = lock.read().map_err(|e| StoreError::Lock {
            collection: R::COLLECTION,
            reason: e.to_string(),
        })?;

        let values = self.read_values(R::COLLECTION)?;
        debug!(collection = %R::COLLECTION, count = values.len(), "Loaded collection");
        values
            .into_iter()
            .map(|value| {
                serde_json::from_value(value).map_err(|source| StoreError::Serialization {
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

        let mut lock = self.open_lock(R::COLLECTION)?;
        let _guard = lock.write().map_err(|e| StoreError::Lock {
            collection: R::COLLECTION,
            reason: e.to_string(),
        })?;

        let mut values = self.read_values(R::COLLECTION)?;
        let position = values
            .iter()
            .position(|existing| existing.get("id").and_then(Value::as_str) == Some(record.id()));
        match position {
            Some(index) => values[index] = value,
            None => values.push(value),
        }
        self.write_values(R::COLLECTION, &values)?;

        debug!(
            collection = %R::COLLECTION,
            id = record.id(),
            replaced = position.is_some(),
            "Upserted record"
        );
        Ok(())
    }
}
