use chrono::Duration;
use uuid::Uuid;

use super::errors::WorkflowError;
use super::traits::{Clock, DocumentStore};
use super::types::{Entity, Role, User};
use crate::store::RecordStore;

/// Days a student waits after supervision approval before requesting a defense
pub const DEFAULT_COOLING_OFF_DAYS: i64 = 90;

/// The workflow context: one record store, one document store, one clock
///
/// Each operation re-reads what it needs from the store, builds the updated
/// record fully in memory and persists it with a single upsert.
#[derive(Debug)]
pub struct ThesisOffice<S, D, C> {
    pub(crate) store: S,
    pub(crate) documents: D,
    pub(crate) clock: C,
    pub(crate) cooling_off: Duration,
}

impl<S, D, C> ThesisOffice<S, D, C>
where
    S: RecordStore,
    D: DocumentStore,
    C: Clock,
{
    pub fn new(store: S, documents: D, clock: C) -> Self {
        Self {
            store,
            documents,
            clock,
            cooling_off: Duration::days(DEFAULT_COOLING_OFF_DAYS),
        }
    }

    pub fn with_cooling_off(mut self, period: Duration) -> Self {
        self.cooling_off = period;
        self
    }

    pub fn cooling_off(&self) -> Duration {
        self.cooling_off
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve a user and check it has the expected role
    pub(crate) fn require_user(&self, user_id: &str, role: Role) -> Result<User, WorkflowError> {
        let user = self
            .store
            .find_by_id::<User>(user_id)?
            .ok_or_else(|| WorkflowError::not_found(Entity::User, user_id))?;
        if user.role != role {
            return Err(WorkflowError::RoleMismatch {
                user_id: user.id,
                expected: role,
                actual: user.role,
            });
        }
        Ok(user)
    }
}

pub(crate) fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}
