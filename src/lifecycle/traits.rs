// Traits for dependency injection - the collaborators the workflows consume

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

/// Source of the current time, injected so the cooling-off rule is testable
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable storage for thesis documents and generated minutes
#[cfg_attr(test, automock)]
pub trait DocumentStore {
    /// Whether `source` resolves to a readable document
    fn exists(&self, source: &Path) -> bool;

    /// Copy the document into durable storage and return its handle
    fn store(&self, source: &Path) -> Result<String, DocumentError>;

    /// Write a text document under a deterministic name, replacing any previous one
    fn write_text(&self, name: &str, content: &str) -> Result<PathBuf, DocumentError>;
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Password hashing and verification
pub trait CredentialService {
    fn hash(&self, password: &str) -> Result<String, CredentialError>;

    /// Malformed stored hashes verify as false
    fn verify(&self, password: &str, stored: &str) -> bool;
}
