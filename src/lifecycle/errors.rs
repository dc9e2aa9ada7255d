use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::traits::{CredentialError, DocumentError};
use super::types::{Entity, Role};
use crate::store::StoreError;

/// Every failure a workflow operation reports to its caller
///
/// None are retried and none are fatal; each aborts only the current
/// operation, before anything is written.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{entity} `{id}` not found")]
    NotFound { entity: Entity, id: String },

    #[error("user `{user_id}` is a {actual}, expected a {expected}")]
    RoleMismatch {
        user_id: String,
        expected: Role,
        actual: Role,
    },

    #[error("{entity} `{id}` is {actual}; expected {expected}")]
    InvalidState {
        entity: Entity,
        id: String,
        expected: String,
        actual: String,
    },

    #[error("no approved supervision request for student `{student_id}` with professor `{professor_id}`")]
    PrerequisiteNotApproved {
        student_id: String,
        professor_id: String,
    },

    #[error("student `{student_id}` has no approved supervision request with professor `{professor_id}`")]
    NoApprovedRequest {
        student_id: String,
        professor_id: String,
    },

    #[error("cooling-off period not elapsed: approved at {approved_at}, defense possible from {eligible_at}")]
    CoolingOffNotElapsed {
        approved_at: DateTime<Utc>,
        eligible_at: DateTime<Utc>,
    },

    #[error("invalid date `{input}`, expected YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("invalid score `{input}`")]
    InvalidScore { input: String },

    #[error("document not found: {}", path.display())]
    DocumentNotFound { path: PathBuf },

    #[error("invalid credentials for `{user_id}`")]
    InvalidCredentials { user_id: String },

    #[error("new password and confirmation do not match")]
    PasswordConfirmationMismatch,

    #[error("document storage failed: {0}")]
    DocumentIo(std::io::Error),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DocumentError> for WorkflowError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound { path } => WorkflowError::DocumentNotFound { path },
            DocumentError::Io(io) => WorkflowError::DocumentIo(io),
        }
    }
}

impl WorkflowError {
    pub(crate) fn not_found(entity: Entity, id: &str) -> Self {
        WorkflowError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_state(
        entity: Entity,
        id: &str,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        WorkflowError::InvalidState {
            entity,
            id: id.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
