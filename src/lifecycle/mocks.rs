// Fakes for testing - no file system, controllable time

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};

use super::office::ThesisOffice;
use super::traits::*;
use crate::store::InMemoryStore;

/// Clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_days(&self, days: i64) {
        self.advance(Duration::days(days));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Document store that records what it was asked to keep
#[derive(Debug, Default)]
pub struct FakeDocuments {
    sources: RefCell<HashSet<PathBuf>>,
    stored: RefCell<Vec<PathBuf>>,
    written: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl FakeDocuments {
    /// Make `path` resolvable
    pub fn add_source(&self, path: &str) {
        self.sources.borrow_mut().insert(PathBuf::from(path));
    }

    /// Make every later `write_text` fail as if the disk were full
    pub fn fail_writes(&self) {
        self.fail_writes.set(true);
    }

    pub fn stored(&self) -> Vec<PathBuf> {
        self.stored.borrow().clone()
    }

    pub fn written(&self) -> HashMap<String, String> {
        self.written.borrow().clone()
    }

    pub fn text_of(&self, name: &str) -> Option<String> {
        self.written.borrow().get(name).cloned()
    }
}

impl DocumentStore for FakeDocuments {
    fn exists(&self, source: &Path) -> bool {
        self.sources.borrow().contains(source)
    }

    fn store(&self, source: &Path) -> Result<String, DocumentError> {
        if !self.exists(source) {
            return Err(DocumentError::NotFound {
                path: source.to_path_buf(),
            });
        }
        self.stored.borrow_mut().push(source.to_path_buf());
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(format!("stored/{name}"))
    }

    fn write_text(&self, name: &str, content: &str) -> Result<PathBuf, DocumentError> {
        if self.fail_writes.get() {
            return Err(DocumentError::Io(std::io::Error::other("disk full")));
        }
        self.written
            .borrow_mut()
            .insert(name.to_string(), content.to_string());
        Ok(PathBuf::from("minutes").join(name))
    }
}

/// Stores passwords behind a fixed prefix; only for tests
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainCredentials;

impl CredentialService for PlainCredentials {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        stored.strip_prefix("plain$") == Some(password)
    }
}

pub type TestOffice = ThesisOffice<InMemoryStore, FakeDocuments, FixedClock>;

impl TestOffice {
    /// Office over an in-memory store holding the fixture users
    pub fn seeded() -> Self {
        let store = InMemoryStore::new();
        fixtures::seed_users(&store);
        ThesisOffice::new(store, FakeDocuments::default(), FixedClock::at(fixtures::epoch()))
    }
}

pub mod fixtures {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::lifecycle::office::ThesisOffice;
    use crate::lifecycle::theses::ThesisSubmission;
    use crate::lifecycle::traits::{Clock, DocumentStore};
    use crate::lifecycle::types::{Course, RequestDecision, Role, Thesis, User};
    use crate::store::RecordStore;

    use super::FakeDocuments;

    pub fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap()
    }

    fn user(id: &str, role: Role, courses: &[&str]) -> User {
        User {
            id: id.to_string(),
            role,
            name: format!("User {id}"),
            password_hash: "plain$secret".to_string(),
            email: format!("{}@example.com", id.to_lowercase()),
            courses: courses
                .iter()
                .map(|c| Course {
                    course_id: c.to_string(),
                    title: format!("Thesis - {c}"),
                })
                .collect(),
            max_supervise: (role == Role::Professor).then_some(10),
            current_supervise: (role == Role::Professor).then_some(0),
        }
    }

    /// Students S1, S2; professor P1 offers T001, P2 offers T002
    pub fn seed_users<S: RecordStore>(store: &S) {
        for u in [
            user("S1", Role::Student, &[]),
            user("S2", Role::Student, &[]),
            user("P1", Role::Professor, &["T001"]),
            user("P2", Role::Professor, &["T002"]),
        ] {
            store.upsert(&u).unwrap();
        }
    }

    pub fn submission(student: &str, professor: &str, document: &str) -> ThesisSubmission {
        ThesisSubmission {
            student_id: student.to_string(),
            professor_id: professor.to_string(),
            title: "State machines in practice".to_string(),
            summary: "How lifecycle rules are enforced.".to_string(),
            keywords: "rust, workflows, ".to_string(),
            document: document.into(),
            year: "1404".to_string(),
            semester: "اول".to_string(),
        }
    }

    fn course_of(professor: &str) -> &'static str {
        match professor {
            "P2" => "T002",
            _ => "T001",
        }
    }

    /// Approve a supervision request now and submit a thesis under it
    pub fn approved_thesis<S, C>(
        office: &ThesisOffice<S, FakeDocuments, C>,
        student: &str,
        professor: &str,
    ) -> Thesis
    where
        S: RecordStore,
        C: Clock,
    {
        let request = office
            .submit_request(student, professor, course_of(professor))
            .unwrap();
        office
            .decide_request(&request.id, RequestDecision::Approve)
            .unwrap();
        let source = format!("/uploads/{student}.pdf");
        office.documents.add_source(&source);
        office
            .submit_thesis(submission(student, professor, &source))
            .unwrap()
    }

    /// A thesis written straight to the store with no supervision request behind it
    pub fn orphan_thesis<S, D, C>(
        office: &ThesisOffice<S, D, C>,
        student: &str,
        professor: &str,
    ) -> Thesis
    where
        S: RecordStore,
        D: DocumentStore,
        C: Clock,
    {
        let thesis = Thesis {
            id: format!("orphan-{student}"),
            student_id: student.to_string(),
            professor_id: professor.to_string(),
            title: "Unsupervised".to_string(),
            summary: String::new(),
            keywords: Vec::new(),
            document: "stored/orphan.pdf".to_string(),
            year: "1404".to_string(),
            semester: "دوم".to_string(),
            submitted_at: epoch(),
            defense_result: None,
            grade_numeric: None,
            grade_letter: None,
        };
        office.store().upsert(&thesis).unwrap();
        thesis
    }
}
