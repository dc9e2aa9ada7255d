// Defense Workflow
//
// pending --approve--> approved --record scores--> approved (+ result, scores)
// pending --reject---> rejected

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tracing::{info, warn};

use super::errors::WorkflowError;
use super::office::{new_record_id, ThesisOffice};
use super::traits::{Clock, DocumentStore};
use super::types::{
    DefenseDecision, DefenseEvent, DefenseRequest, DefenseResult, DefenseStatus, Entity,
    RequestStatus, SupervisionRequest, Thesis,
};
use crate::store::RecordStore;

impl DefenseRequest {
    /// Apply an event, returning the next version of the defense request
    ///
    /// Decisions need `pending`. Scores need `approved` and replace any
    /// previously recorded scores.
    pub fn apply(&self, event: DefenseEvent, now: DateTime<Utc>) -> Result<Self, WorkflowError> {
        let mut next = self.clone();
        match (self.status, event) {
            (DefenseStatus::Pending, DefenseEvent::Approve) => {
                next.status = DefenseStatus::Approved;
                next.approved_at = Some(now);
            }
            (DefenseStatus::Pending, DefenseEvent::Reject) => {
                next.status = DefenseStatus::Rejected;
            }
            (DefenseStatus::Approved, DefenseEvent::RecordScores(scores)) => {
                next.result = Some(DefenseResult::from_average(scores.average));
                next.scores = Some(scores);
            }
            (status, DefenseEvent::RecordScores(_)) => {
                return Err(WorkflowError::invalid_state(
                    Entity::DefenseRequest,
                    &self.id,
                    DefenseStatus::Approved,
                    status,
                ));
            }
            (status, _) => {
                return Err(WorkflowError::invalid_state(
                    Entity::DefenseRequest,
                    &self.id,
                    DefenseStatus::Pending,
                    status,
                ));
            }
        }
        Ok(next)
    }
}

/// Parse a proposed defense date; a bare date means midnight
pub fn parse_proposed_date(input: &str) -> Result<NaiveDateTime, WorkflowError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    trimmed
        .parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| WorkflowError::InvalidDate {
            input: input.to_string(),
        })
}

impl<S, D, C> ThesisOffice<S, D, C>
where
    S: RecordStore,
    D: DocumentStore,
    C: Clock,
{
    /// Ask for a defense once the supervision approval is old enough
    ///
    /// The originating request is the student's first approved request with
    /// the thesis's professor.
    pub fn request_defense(
        &self,
        thesis_id: &str,
        proposed_date: &str,
        internal_judge: &str,
        external_judge: &str,
    ) -> Result<DefenseRequest, WorkflowError> {
        let thesis = self
            .store
            .find_by_id::<Thesis>(thesis_id)?
            .ok_or_else(|| WorkflowError::not_found(Entity::Thesis, thesis_id))?;

        let approved_at = self
            .store
            .load_all::<SupervisionRequest>()?
            .into_iter()
            .find(|r| {
                r.student_id == thesis.student_id
                    && r.professor_id == thesis.professor_id
                    && r.status == RequestStatus::Approved
            })
            .and_then(|r| r.approved_at)
            .ok_or_else(|| WorkflowError::PrerequisiteNotApproved {
                student_id: thesis.student_id.clone(),
                professor_id: thesis.professor_id.clone(),
            })?;

        let now = self.clock.now();
        let eligible_at = approved_at + self.cooling_off;
        if now < eligible_at {
            warn!(
                thesis_id = %thesis_id,
                approved_at = %approved_at,
                eligible_at = %eligible_at,
                "Defense requested before cooling-off period elapsed"
            );
            return Err(WorkflowError::CoolingOffNotElapsed {
                approved_at,
                eligible_at,
            });
        }

        let requested_date = parse_proposed_date(proposed_date)?;

        let defense = DefenseRequest {
            id: new_record_id(),
            thesis_id: thesis.id,
            requested_date,
            internal_judge: internal_judge.to_string(),
            external_judge: external_judge.to_string(),
            status: DefenseStatus::Pending,
            created_at: now,
            approved_at: None,
            result: None,
            scores: None,
        };
        self.store.upsert(&defense)?;

        info!(
            defense_id = %defense.id,
            thesis_id = %defense.thesis_id,
            requested_date = %defense.requested_date,
            "Defense requested"
        );
        Ok(defense)
    }

    /// Approve or reject a pending defense request; rejection carries no reason
    pub fn decide_defense(
        &self,
        defense_id: &str,
        decision: DefenseDecision,
    ) -> Result<DefenseRequest, WorkflowError> {
        let current = self.require_defense(defense_id)?;
        let next = current
            .apply(decision.into(), self.clock.now())
            .inspect_err(|e| {
                warn!(defense_id = %defense_id, error = %e, "Defense transition refused");
            })?;
        self.store.upsert(&next)?;

        info!(
            defense_id = %next.id,
            from = %current.status,
            to = %next.status,
            "Defense request transitioned"
        );
        Ok(next)
    }

    /// Defense requests whose thesis is supervised by `professor_id`
    pub fn defenses_for_professor(
        &self,
        professor_id: &str,
    ) -> Result<Vec<DefenseRequest>, WorkflowError> {
        let supervised: HashSet<String> = self
            .store
            .load_all::<Thesis>()?
            .into_iter()
            .filter(|t| t.professor_id == professor_id)
            .map(|t| t.id)
            .collect();

        Ok(self
            .store
            .load_all::<DefenseRequest>()?
            .into_iter()
            .filter(|d| supervised.contains(&d.thesis_id))
            .collect())
    }

    pub(crate) fn require_defense(&self, defense_id: &str) -> Result<DefenseRequest, WorkflowError> {
        self.store
            .find_by_id::<DefenseRequest>(defense_id)?
            .ok_or_else(|| WorkflowError::not_found(Entity::DefenseRequest, defense_id))
    }
}
