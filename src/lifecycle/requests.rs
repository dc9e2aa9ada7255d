// Supervision Request Workflow
//
// pending --approve--> approved
// pending --reject---> rejected --resubmit--> pending (same id)

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::errors::WorkflowError;
use super::office::{new_record_id, ThesisOffice};
use super::traits::{Clock, DocumentStore};
use super::types::{
    Entity, RequestDecision, RequestEvent, RequestStatus, Role, SupervisionRequest,
};
use crate::store::RecordStore;

impl SupervisionRequest {
    /// Apply an event, returning the next version of the request
    ///
    /// Approve and reject need `pending`; resubmit needs `rejected`.
    pub fn apply(&self, event: RequestEvent, now: DateTime<Utc>) -> Result<Self, WorkflowError> {
        let mut next = self.clone();
        match (self.status, event) {
            (RequestStatus::Pending, RequestEvent::Approve) => {
                next.status = RequestStatus::Approved;
                next.approved_at = Some(now);
            }
            (RequestStatus::Pending, RequestEvent::Reject { reason }) => {
                next.status = RequestStatus::Rejected;
                next.rejection_reason = Some(reason);
            }
            (RequestStatus::Rejected, RequestEvent::Resubmit) => {
                next.status = RequestStatus::Pending;
                next.rejection_reason = None;
                next.created_at = now;
            }
            (status, RequestEvent::Resubmit) => {
                return Err(WorkflowError::invalid_state(
                    Entity::SupervisionRequest,
                    &self.id,
                    RequestStatus::Rejected,
                    status,
                ));
            }
            (status, _) => {
                return Err(WorkflowError::invalid_state(
                    Entity::SupervisionRequest,
                    &self.id,
                    RequestStatus::Pending,
                    status,
                ));
            }
        }
        Ok(next)
    }
}

impl<S, D, C> ThesisOffice<S, D, C>
where
    S: RecordStore,
    D: DocumentStore,
    C: Clock,
{
    /// Create a pending request from a student to a professor for one of their courses
    ///
    /// Duplicate pending requests for the same professor and course are allowed.
    pub fn submit_request(
        &self,
        student_id: &str,
        professor_id: &str,
        course_id: &str,
    ) -> Result<SupervisionRequest, WorkflowError> {
        self.require_user(student_id, Role::Student)?;
        let professor = self.require_user(professor_id, Role::Professor)?;
        if !professor.offers_course(course_id) {
            return Err(WorkflowError::not_found(Entity::Course, course_id));
        }

        let request = SupervisionRequest {
            id: new_record_id(),
            student_id: student_id.to_string(),
            professor_id: professor_id.to_string(),
            course_id: course_id.to_string(),
            status: RequestStatus::Pending,
            created_at: self.clock.now(),
            approved_at: None,
            rejection_reason: None,
        };
        self.store.upsert(&request)?;

        info!(
            request_id = %request.id,
            student_id = %student_id,
            professor_id = %professor_id,
            course_id = %course_id,
            "Supervision request submitted"
        );
        Ok(request)
    }

    /// Approve or reject a pending request
    pub fn decide_request(
        &self,
        request_id: &str,
        decision: RequestDecision,
    ) -> Result<SupervisionRequest, WorkflowError> {
        self.transition_request(request_id, decision.into())
    }

    /// Return a rejected request to pending under its original id
    pub fn resubmit(&self, request_id: &str) -> Result<SupervisionRequest, WorkflowError> {
        self.transition_request(request_id, RequestEvent::Resubmit)
    }

    pub fn requests_for_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<SupervisionRequest>, WorkflowError> {
        Ok(self
            .store
            .load_all::<SupervisionRequest>()?
            .into_iter()
            .filter(|r| r.student_id == student_id)
            .collect())
    }

    pub fn approved_requests_for_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<SupervisionRequest>, WorkflowError> {
        let mut requests = self.requests_for_student(student_id)?;
        requests.retain(|r| r.status == RequestStatus::Approved);
        Ok(requests)
    }

    pub fn requests_for_professor(
        &self,
        professor_id: &str,
        status: Option<RequestStatus>,
    ) -> Result<Vec<SupervisionRequest>, WorkflowError> {
        Ok(self
            .store
            .load_all::<SupervisionRequest>()?
            .into_iter()
            .filter(|r| r.professor_id == professor_id)
            .filter(|r| status.map_or(true, |s| r.status == s))
            .collect())
    }

    fn transition_request(
        &self,
        request_id: &str,
        event: RequestEvent,
    ) -> Result<SupervisionRequest, WorkflowError> {
        let current = self
            .store
            .find_by_id::<SupervisionRequest>(request_id)?
            .ok_or_else(|| WorkflowError::not_found(Entity::SupervisionRequest, request_id))?;

        let next = current.apply(event, self.clock.now()).inspect_err(|e| {
            warn!(request_id = %request_id, error = %e, "Supervision request transition refused");
        })?;
        self.store.upsert(&next)?;

        info!(
            request_id = %next.id,
            from = %current.status,
            to = %next.status,
            "Supervision request transitioned"
        );
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::mocks::{fixtures, TestOffice};

    #[test]
    fn test_submit_request_creates_pending_request() {
        let office = TestOffice::seeded();
        let request = office.submit_request("S1", "P1", "T001").unwrap();

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.created_at, fixtures::epoch());
        assert!(request.approved_at.is_none());

        let stored = office
            .store()
            .find_by_id::<SupervisionRequest>(&request.id)
            .unwrap();
        assert_eq!(stored, Some(request));
    }

    #[test]
    fn test_submit_request_validates_professor_and_course() {
        let office = TestOffice::seeded();

        assert!(matches!(
            office.submit_request("S1", "P404", "T001"),
            Err(WorkflowError::NotFound { entity: Entity::User, .. })
        ));
        assert!(matches!(
            office.submit_request("S1", "S2", "T001"),
            Err(WorkflowError::RoleMismatch { expected: Role::Professor, .. })
        ));
        assert!(matches!(
            office.submit_request("S1", "P1", "T999"),
            Err(WorkflowError::NotFound { entity: Entity::Course, .. })
        ));
    }

    #[test]
    fn test_duplicate_pending_requests_are_allowed() {
        let office = TestOffice::seeded();
        let first = office.submit_request("S1", "P1", "T001").unwrap();
        let second = office.submit_request("S1", "P1", "T001").unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(office.requests_for_student("S1").unwrap().len(), 2);
    }

    #[test]
    fn test_approve_stamps_approval_time() {
        let office = TestOffice::seeded();
        let request = office.submit_request("S1", "P1", "T001").unwrap();
        office.clock.advance_days(3);

        let approved = office
            .decide_request(&request.id, RequestDecision::Approve)
            .unwrap();
        assert_eq!(approved.status, RequestStatus::Approved);
        assert_eq!(approved.approved_at, Some(office.clock.now()));
    }

    #[test]
    fn test_deciding_non_pending_request_is_invalid_state() {
        let office = TestOffice::seeded();
        let request = office.submit_request("S1", "P1", "T001").unwrap();
        office
            .decide_request(&request.id, RequestDecision::Approve)
            .unwrap();

        let again = office.decide_request(
            &request.id,
            RequestDecision::Reject {
                reason: "late".to_string(),
            },
        );
        assert!(matches!(again, Err(WorkflowError::InvalidState { .. })));
    }

    #[test]
    fn test_reject_then_resubmit_keeps_identifier() {
        let office = TestOffice::seeded();
        let request = office.submit_request("S1", "P1", "T001").unwrap();
        let rejected = office
            .decide_request(
                &request.id,
                RequestDecision::Reject {
                    reason: "topic unclear".to_string(),
                },
            )
            .unwrap();
        assert_eq!(rejected.rejection_reason.as_deref(), Some("topic unclear"));

        office.clock.advance_days(1);
        let resubmitted = office.resubmit(&request.id).unwrap();
        assert_eq!(resubmitted.id, request.id);
        assert_eq!(resubmitted.status, RequestStatus::Pending);
        assert_eq!(resubmitted.rejection_reason, None);
        assert!(resubmitted.created_at > request.created_at);
        assert_eq!(office.requests_for_student("S1").unwrap().len(), 1);
    }

    #[test]
    fn test_resubmit_requires_rejected_status() {
        let office = TestOffice::seeded();
        let request = office.submit_request("S1", "P1", "T001").unwrap();

        assert!(matches!(
            office.resubmit(&request.id),
            Err(WorkflowError::InvalidState { .. })
        ));
        assert!(matches!(
            office.resubmit("missing"),
            Err(WorkflowError::NotFound { .. })
        ));
    }

    #[test]
    fn test_requests_for_professor_filters_by_status() {
        let office = TestOffice::seeded();
        let a = office.submit_request("S1", "P1", "T001").unwrap();
        office.submit_request("S2", "P1", "T001").unwrap();
        office.submit_request("S1", "P2", "T002").unwrap();
        office.decide_request(&a.id, RequestDecision::Approve).unwrap();

        assert_eq!(office.requests_for_professor("P1", None).unwrap().len(), 2);
        let pending = office
            .requests_for_professor("P1", Some(RequestStatus::Pending))
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].student_id, "S2");
    }
}
