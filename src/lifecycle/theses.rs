// Thesis Submission Workflow

use std::path::PathBuf;

use tracing::{info, warn};

use super::errors::WorkflowError;
use super::office::{new_record_id, ThesisOffice};
use super::traits::{Clock, DocumentStore};
use super::types::{parse_keywords, RequestStatus, SupervisionRequest, Thesis};
use crate::store::RecordStore;

/// Everything a student provides when registering a thesis
#[derive(Debug, Clone)]
pub struct ThesisSubmission {
    pub student_id: String,
    pub professor_id: String,
    pub title: String,
    pub summary: String,
    /// Comma-separated, as typed by the student
    pub keywords: String,
    pub document: PathBuf,
    pub year: String,
    pub semester: String,
}

impl<S, D, C> ThesisOffice<S, D, C>
where
    S: RecordStore,
    D: DocumentStore,
    C: Clock,
{
    /// Register a thesis under an approved supervision request
    ///
    /// Order matters: the approved request is checked, then the document is
    /// resolved, then stored, and only then is the thesis record written.
    pub fn submit_thesis(&self, submission: ThesisSubmission) -> Result<Thesis, WorkflowError> {
        let has_approved_request = self
            .store
            .load_all::<SupervisionRequest>()?
            .iter()
            .any(|r| {
                r.student_id == submission.student_id
                    && r.professor_id == submission.professor_id
                    && r.status == RequestStatus::Approved
            });
        if !has_approved_request {
            warn!(
                student_id = %submission.student_id,
                professor_id = %submission.professor_id,
                "Thesis submission without approved supervision request"
            );
            return Err(WorkflowError::NoApprovedRequest {
                student_id: submission.student_id,
                professor_id: submission.professor_id,
            });
        }

        if !self.documents.exists(&submission.document) {
            return Err(WorkflowError::DocumentNotFound {
                path: submission.document,
            });
        }
        let document = self.documents.store(&submission.document)?;

        let thesis = Thesis {
            id: new_record_id(),
            student_id: submission.student_id,
            professor_id: submission.professor_id,
            title: submission.title,
            summary: submission.summary,
            keywords: parse_keywords(&submission.keywords),
            document,
            year: submission.year,
            semester: submission.semester,
            submitted_at: self.clock.now(),
            defense_result: None,
            grade_numeric: None,
            grade_letter: None,
        };
        self.store.upsert(&thesis)?;

        info!(
            thesis_id = %thesis.id,
            student_id = %thesis.student_id,
            professor_id = %thesis.professor_id,
            document = %thesis.document,
            "Thesis submitted"
        );
        Ok(thesis)
    }

    pub fn theses_for_student(&self, student_id: &str) -> Result<Vec<Thesis>, WorkflowError> {
        Ok(self
            .store
            .load_all::<Thesis>()?
            .into_iter()
            .filter(|t| t.student_id == student_id)
            .collect())
    }

    /// Case-insensitive match on title, keywords, author id or year
    pub fn search_theses(&self, query: &str) -> Result<Vec<Thesis>, WorkflowError> {
        let query = query.trim().to_lowercase();
        Ok(self
            .store
            .load_all::<Thesis>()?
            .into_iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&query)
                    || t.keywords.join(" ").to_lowercase().contains(&query)
                    || t.student_id.to_lowercase().contains(&query)
                    || t.year.to_lowercase().contains(&query)
            })
            .collect())
    }
}
