// Thesis Desk Library - thesis lifecycle from supervision request to grade
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod credentials;
pub mod documents;
pub mod lifecycle;
pub mod store;
pub mod telemetry;

// Re-export key types for easy access
pub use config::ThesisDeskConfig;
pub use credentials::Pbkdf2Credentials;
pub use documents::FsDocumentStore;
pub use lifecycle::{
    Accounts, DefenseRequest, GradingOutcome, RequestDecision, Role, SupervisionRequest, Thesis,
    ThesisOffice, ThesisSubmission, User, WorkflowError,
};
pub use store::{Collection, InMemoryStore, JsonFileStore, RecordStore, StoreError};
pub use telemetry::{create_workflow_span, generate_correlation_id, init_telemetry};
