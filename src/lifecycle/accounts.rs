// Accounts - credential checks, password changes and the demo roster

use tracing::{info, warn};

use super::errors::WorkflowError;
use super::traits::CredentialService;
use super::types::{Course, Entity, Role, User};
use crate::store::RecordStore;

/// User-facing account operations over the users collection
#[derive(Debug)]
pub struct Accounts<S, H> {
    store: S,
    credentials: H,
}

impl<S, H> Accounts<S, H>
where
    S: RecordStore,
    H: CredentialService,
{
    pub fn new(store: S, credentials: H) -> Self {
        Self { store, credentials }
    }

    /// Log in as `role`; unknown id, wrong role and wrong password are indistinguishable
    pub fn authenticate(
        &self,
        user_id: &str,
        password: &str,
        role: Role,
    ) -> Result<User, WorkflowError> {
        let user = self
            .store
            .find_by_id::<User>(user_id)?
            .filter(|u| u.role == role)
            .filter(|u| self.credentials.verify(password, &u.password_hash));

        match user {
            Some(user) => {
                info!(user_id = %user.id, role = %role, "User authenticated");
                Ok(user)
            }
            None => {
                warn!(user_id = %user_id, role = %role, "Authentication failed");
                Err(WorkflowError::InvalidCredentials {
                    user_id: user_id.to_string(),
                })
            }
        }
    }

    pub fn change_password(
        &self,
        user_id: &str,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<User, WorkflowError> {
        let mut user = self
            .store
            .find_by_id::<User>(user_id)?
            .ok_or_else(|| WorkflowError::not_found(Entity::User, user_id))?;

        if !self.credentials.verify(current, &user.password_hash) {
            return Err(WorkflowError::InvalidCredentials {
                user_id: user_id.to_string(),
            });
        }
        if new != confirm {
            return Err(WorkflowError::PasswordConfirmationMismatch);
        }

        user.password_hash = self.credentials.hash(new)?;
        self.store.upsert(&user)?;
        info!(user_id = %user.id, "Password changed");
        Ok(user)
    }

    pub fn list_professors(&self) -> Result<Vec<User>, WorkflowError> {
        Ok(self
            .store
            .load_all::<User>()?
            .into_iter()
            .filter(User::is_professor)
            .collect())
    }

    /// Insert the sample roster when no user exists yet; returns how many were added
    pub fn seed_demo_users(&self) -> Result<usize, WorkflowError> {
        if !self.store.load_all::<User>()?.is_empty() {
            return Ok(0);
        }

        let student_hash = self.credentials.hash("student123")?;
        let professor_hash = self.credentials.hash("prof123")?;
        let roster = [
            student("S1001", "علی رضایی", "ali@example.com", &student_hash),
            student("S1002", "سارا محمدی", "sara@example.com", &student_hash),
            professor(
                "P2001",
                "دکتر وحید حسینی",
                "vahid@example.com",
                &professor_hash,
                Course {
                    course_id: "T001".to_string(),
                    title: "پایان‌نامه - مهندسی نرم‌افزار".to_string(),
                },
            ),
            professor(
                "P2002",
                "دکتر نسرین موسوی",
                "nasrin@example.com",
                &professor_hash,
                Course {
                    course_id: "T002".to_string(),
                    title: "پایان‌نامه - شبکه‌های کامپیوتری".to_string(),
                },
            ),
        ];

        for user in &roster {
            self.store.upsert(user)?;
        }
        info!(count = roster.len(), "Seeded demo users");
        Ok(roster.len())
    }
}

fn student(id: &str, name: &str, email: &str, password_hash: &str) -> User {
    User {
        id: id.to_string(),
        role: Role::Student,
        name: name.to_string(),
        password_hash: password_hash.to_string(),
        email: email.to_string(),
        courses: Vec::new(),
        max_supervise: None,
        current_supervise: None,
    }
}

fn professor(id: &str, name: &str, email: &str, password_hash: &str, course: Course) -> User {
    User {
        id: id.to_string(),
        role: Role::Professor,
        name: name.to_string(),
        password_hash: password_hash.to_string(),
        email: email.to_string(),
        courses: vec![course],
        max_supervise: Some(10),
        current_supervise: Some(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::mocks::PlainCredentials;
    use crate::store::{Collection, InMemoryStore};

    fn seeded(store: &InMemoryStore) -> Accounts<&InMemoryStore, PlainCredentials> {
        let accounts = Accounts::new(store, PlainCredentials);
        accounts.seed_demo_users().unwrap();
        accounts
    }

    #[test]
    fn test_seed_is_idempotent() {
        let store = InMemoryStore::new();
        let accounts = seeded(&store);

        assert_eq!(store.len(Collection::Users), 4);
        assert_eq!(accounts.seed_demo_users().unwrap(), 0);
        assert_eq!(store.len(Collection::Users), 4);
    }

    #[test]
    fn test_authenticate_checks_role_and_password() {
        let store = InMemoryStore::new();
        let accounts = seeded(&store);

        let user = accounts
            .authenticate("S1001", "student123", Role::Student)
            .unwrap();
        assert_eq!(user.role, Role::Student);

        for (id, password, role) in [
            ("S1001", "wrong", Role::Student),
            ("S1001", "student123", Role::Professor),
            ("S9999", "student123", Role::Student),
        ] {
            assert!(matches!(
                accounts.authenticate(id, password, role),
                Err(WorkflowError::InvalidCredentials { .. })
            ));
        }
    }

    #[test]
    fn test_change_password_keeps_role() {
        let store = InMemoryStore::new();
        let accounts = seeded(&store);

        assert!(matches!(
            accounts.change_password("P2001", "nope", "n", "n"),
            Err(WorkflowError::InvalidCredentials { .. })
        ));
        assert!(matches!(
            accounts.change_password("P2001", "prof123", "a", "b"),
            Err(WorkflowError::PasswordConfirmationMismatch)
        ));

        let updated = accounts
            .change_password("P2001", "prof123", "s3cret", "s3cret")
            .unwrap();
        assert_eq!(updated.role, Role::Professor);
        assert_eq!(updated.courses.len(), 1);
        assert!(accounts
            .authenticate("P2001", "s3cret", Role::Professor)
            .is_ok());
        assert!(accounts
            .authenticate("P2001", "prof123", Role::Professor)
            .is_err());
    }

    #[test]
    fn test_list_professors_returns_only_professors() {
        let store = InMemoryStore::new();
        let accounts = seeded(&store);

        let ids: Vec<String> = accounts
            .list_professors()
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["P2001", "P2002"]);
    }
}
