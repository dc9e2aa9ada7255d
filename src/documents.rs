// File System Document Store - submitted theses and generated minutes
//
// Submitted documents are copied in under `<uuid>_<original name>`; text
// documents such as minutes are written under the name they are given.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::lifecycle::traits::{DocumentError, DocumentStore};

#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    files_dir: PathBuf,
}

impl FsDocumentStore {
    pub fn new<P: AsRef<Path>>(files_dir: P) -> Self {
        Self {
            files_dir: files_dir.as_ref().to_path_buf(),
        }
    }

    pub fn files_dir(&self) -> &Path {
        &self.files_dir
    }
}

impl DocumentStore for FsDocumentStore {
    fn exists(&self, source: &Path) -> bool {
        source.is_file()
    }

    fn store(&self, source: &Path) -> Result<String, DocumentError> {
        if !self.exists(source) {
            return Err(DocumentError::NotFound {
                path: source.to_path_buf(),
            });
        }
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        fs::create_dir_all(&self.files_dir)?;
        let destination = self.files_dir.join(format!("{}_{}", Uuid::new_v4(), file_name));
        fs::copy(source, &destination)?;

        debug!(source = %source.display(), destination = %destination.display(), "Stored document");
        Ok(destination.to_string_lossy().into_owned())
    }

    fn write_text(&self, name: &str, content: &str) -> Result<PathBuf, DocumentError> {
        fs::create_dir_all(&self.files_dir)?;
        let path = self.files_dir.join(name);
        fs::write(&path, content)?;
        debug!(path = %path.display(), bytes = content.len(), "Wrote text document");
        Ok(path)
    }
}
