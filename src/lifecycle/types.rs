// Core types for the thesis lifecycle

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Collection, Record};

/// Actor roles; fixed when the user is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Professor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => f.write_str("student"),
            Role::Professor => f.write_str("professor"),
        }
    }
}

/// A course a professor may supervise theses under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub role: Role,
    pub name: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    pub email: String,
    /// Professors only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub courses: Vec<Course>,
    /// Informational; never enforced as a cap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_supervise: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_supervise: Option<u32>,
}

impl User {
    pub fn is_professor(&self) -> bool {
        self.role == Role::Professor
    }

    pub fn offers_course(&self, course_id: &str) -> bool {
        self.courses.iter().any(|c| c.course_id == course_id)
    }
}

impl Record for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => f.write_str("pending"),
            RequestStatus::Approved => f.write_str("approved"),
            RequestStatus::Rejected => f.write_str("rejected"),
        }
    }
}

/// A student's ask for a professor to supervise a thesis under one course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupervisionRequest {
    pub id: String,
    pub student_id: String,
    pub professor_id: String,
    pub course_id: String,
    pub status: RequestStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub approved_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

impl Record for SupervisionRequest {
    const COLLECTION: Collection = Collection::SupervisionRequests;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Events driving the supervision request state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestEvent {
    Approve,
    Reject { reason: String },
    Resubmit,
}

/// A professor's verdict on a pending supervision request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestDecision {
    Approve,
    /// The reason is expected to be non-empty but that is not enforced
    Reject { reason: String },
}

impl From<RequestDecision> for RequestEvent {
    fn from(decision: RequestDecision) -> Self {
        match decision {
            RequestDecision::Approve => RequestEvent::Approve,
            RequestDecision::Reject { reason } => RequestEvent::Reject { reason },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thesis {
    pub id: String,
    pub student_id: String,
    pub professor_id: String,
    pub title: String,
    #[serde(rename = "abstract")]
    pub summary: String,
    pub keywords: Vec<String>,
    /// Opaque handle returned by the document store
    #[serde(rename = "file_path")]
    pub document: String,
    pub year: String,
    pub semester: String,
    #[serde(with = "timestamp")]
    pub submitted_at: DateTime<Utc>,
    #[serde(rename = "defense")]
    pub defense_result: Option<DefenseResult>,
    pub grade_numeric: Option<f64>,
    pub grade_letter: Option<LetterGrade>,
}

impl Record for Thesis {
    const COLLECTION: Collection = Collection::Theses;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefenseStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for DefenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefenseStatus::Pending => f.write_str("pending"),
            DefenseStatus::Approved => f.write_str("approved"),
            DefenseStatus::Rejected => f.write_str("rejected"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefenseResult {
    #[serde(rename = "defended")]
    Defended,
    #[serde(rename = "re-defend")]
    Redefend,
}

impl fmt::Display for DefenseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefenseResult::Defended => f.write_str("defended"),
            DefenseResult::Redefend => f.write_str("re-defend"),
        }
    }
}

/// Letter grades, persisted and displayed with their Persian labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterGrade {
    #[serde(rename = "الف")]
    A,
    #[serde(rename = "ب")]
    B,
    #[serde(rename = "ج")]
    C,
    #[serde(rename = "د")]
    D,
}

impl LetterGrade {
    pub fn label(self) -> &'static str {
        match self {
            LetterGrade::A => "الف",
            LetterGrade::B => "ب",
            LetterGrade::C => "ج",
            LetterGrade::D => "د",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scores of the three examiners plus the derived average and letter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub guide: f64,
    pub internal: f64,
    pub external: f64,
    #[serde(rename = "avg")]
    pub average: f64,
    pub letter: LetterGrade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefenseRequest {
    pub id: String,
    pub thesis_id: String,
    pub requested_date: NaiveDateTime,
    pub internal_judge: String,
    pub external_judge: String,
    pub status: DefenseStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub approved_at: Option<DateTime<Utc>>,
    pub result: Option<DefenseResult>,
    pub scores: Option<ScoreBreakdown>,
}

impl DefenseRequest {
    /// Scores recorded; there is no separate "graded" status
    pub fn is_graded(&self) -> bool {
        self.result.is_some() && self.scores.is_some()
    }
}

impl Record for DefenseRequest {
    const COLLECTION: Collection = Collection::DefenseRequests;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Events driving the defense request state machine
#[derive(Debug, Clone, PartialEq)]
pub enum DefenseEvent {
    Approve,
    Reject,
    RecordScores(ScoreBreakdown),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefenseDecision {
    Approve,
    Reject,
}

impl From<DefenseDecision> for DefenseEvent {
    fn from(decision: DefenseDecision) -> Self {
        match decision {
            DefenseDecision::Approve => DefenseEvent::Approve,
            DefenseDecision::Reject => DefenseEvent::Reject,
        }
    }
}

/// Kinds of entities referenced by errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Course,
    SupervisionRequest,
    Thesis,
    DefenseRequest,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::User => "user",
            Entity::Course => "course",
            Entity::SupervisionRequest => "supervision request",
            Entity::Thesis => "thesis",
            Entity::DefenseRequest => "defense request",
        };
        f.write_str(name)
    }
}

/// Split a comma-separated keyword list, trimming and dropping blank entries
///
/// Order is preserved and duplicates are kept.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Timestamps are written as RFC 3339; values without an offset read as UTC
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .ok()
            .or_else(|| raw.parse::<NaiveDateTime>().ok().map(|t| t.and_utc()))
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp `{raw}`")))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            value.serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid timestamp `{raw}`"))),
            }
        }
    }
}
