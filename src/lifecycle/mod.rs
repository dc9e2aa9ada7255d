// Thesis Lifecycle Module - gated state transitions with injected collaborators
//
// Requests feed theses, theses feed defenses, defenses feed grading. Every
// collaborator (records, documents, time, credentials) is a trait so the
// workflows can run against in-memory fakes.

pub mod accounts;
pub mod defenses;
pub mod errors;
pub mod grading;
pub mod office;
pub mod requests;
pub mod theses;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod mocks;


pub use accounts::Accounts;
pub use defenses::parse_proposed_date;
pub use errors::WorkflowError;
pub use grading::{minutes_file_name, parse_score, render_minutes, GradingOutcome};
pub use office::{ThesisOffice, DEFAULT_COOLING_OFF_DAYS};
pub use theses::ThesisSubmission;
pub use traits::{Clock, CredentialError, CredentialService, DocumentError, DocumentStore, SystemClock};
pub use types::{
    parse_keywords, Course, DefenseDecision, DefenseEvent, DefenseRequest, DefenseResult,
    DefenseStatus, Entity, LetterGrade, RequestDecision, RequestEvent, RequestStatus, Role,
    ScoreBreakdown, SupervisionRequest, Thesis, User,
};
