// Grading & Minutes Workflow

use std::path::PathBuf;

use tracing::info;

use super::errors::WorkflowError;
use super::office::ThesisOffice;
use super::traits::{Clock, DocumentStore};
use super::types::{DefenseEvent, DefenseRequest, DefenseResult, Entity, LetterGrade, ScoreBreakdown, Thesis};
use crate::store::RecordStore;

/// Lowest average that counts as a successful defense
pub const PASSING_AVERAGE: f64 = 10.0;

impl LetterGrade {
    /// Thresholds apply to the unrounded average
    pub fn from_average(average: f64) -> Self {
        if average >= 17.0 {
            LetterGrade::A
        } else if average >= 13.0 {
            LetterGrade::B
        } else if average >= 10.0 {
            LetterGrade::C
        } else {
            LetterGrade::D
        }
    }
}

impl DefenseResult {
    pub fn from_average(average: f64) -> Self {
        if average >= PASSING_AVERAGE {
            DefenseResult::Defended
        } else {
            DefenseResult::Redefend
        }
    }
}

impl ScoreBreakdown {
    /// Scores are conventionally 0-20 but are not clamped
    pub fn from_scores(guide: f64, internal: f64, external: f64) -> Self {
        let average = (guide + internal + external) / 3.0;
        Self {
            guide,
            internal,
            external,
            average,
            letter: LetterGrade::from_average(average),
        }
    }
}

/// Parse one examiner score as typed by the user
pub fn parse_score(input: &str) -> Result<f64, WorkflowError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite())
        .ok_or_else(|| WorkflowError::InvalidScore {
            input: input.to_string(),
        })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Result of recording defense scores
#[derive(Debug, Clone, PartialEq)]
pub struct GradingOutcome {
    pub defense: DefenseRequest,
    pub thesis: Thesis,
    pub minutes: PathBuf,
}

/// Deterministic minutes name; regenerating overwrites the previous file
pub fn minutes_file_name(thesis_id: &str) -> String {
    format!("minutes_{thesis_id}.txt")
}

/// Human-readable minutes for a thesis snapshot
pub fn render_minutes(thesis: &Thesis) -> String {
    let numeric = thesis
        .grade_numeric
        .map(|grade| grade.to_string())
        .unwrap_or_else(|| "-".to_string());
    let letter = thesis
        .grade_letter
        .map(|grade| grade.to_string())
        .unwrap_or_else(|| "-".to_string());

    [
        "صورت‌جلسه نهایی دفاع پایان‌نامه".to_string(),
        "--------------------------------".to_string(),
        format!("عنوان: {}", thesis.title),
        format!("نویسنده: {}", thesis.student_id),
        format!("استاد راهنما: {}", thesis.professor_id),
        format!("تاریخ ارسال: {}", thesis.submitted_at.to_rfc3339()),
        String::new(),
        "نمرات و نتیجه:".to_string(),
        format!("عددی: {numeric}"),
        format!("حرفی: {letter}"),
        String::new(),
        format!("فایل پایان‌نامه: {}", thesis.document),
    ]
    .join("\n")
}

impl<S, D, C> ThesisOffice<S, D, C>
where
    S: RecordStore,
    D: DocumentStore,
    C: Clock,
{
    /// Record the three examiner scores for an approved defense
    ///
    /// Writes the minutes, then updates the defense (scores, result) and the
    /// thesis (grade fields, defense result). Re-running replaces the previous
    /// scores and minutes.
    pub fn record_scores(
        &self,
        defense_id: &str,
        guide: f64,
        internal: f64,
        external: f64,
    ) -> Result<GradingOutcome, WorkflowError> {
        let current = self.require_defense(defense_id)?;

        if let Some(bad) = [guide, internal, external].into_iter().find(|s| !s.is_finite()) {
            return Err(WorkflowError::InvalidScore {
                input: bad.to_string(),
            });
        }

        let breakdown = ScoreBreakdown::from_scores(guide, internal, external);
        let defense = current.apply(DefenseEvent::RecordScores(breakdown.clone()), self.clock.now())?;

        let mut thesis = self
            .store
            .find_by_id::<Thesis>(&defense.thesis_id)?
            .ok_or_else(|| WorkflowError::not_found(Entity::Thesis, &defense.thesis_id))?;
        thesis.grade_numeric = Some(round2(breakdown.average));
        thesis.grade_letter = Some(breakdown.letter);
        thesis.defense_result = defense.result;

        // Minutes first: a failed write must leave both records ungraded
        let minutes = self.generate_minutes(&thesis)?;
        self.store.upsert(&defense)?;
        self.store.upsert(&thesis)?;

        info!(
            defense_id = %defense.id,
            thesis_id = %thesis.id,
            average = breakdown.average,
            letter = %breakdown.letter,
            result = ?defense.result,
            "Defense scores recorded"
        );

        Ok(GradingOutcome {
            defense,
            thesis,
            minutes,
        })
    }

    /// Write the minutes document for a thesis snapshot
    pub fn generate_minutes(&self, thesis: &Thesis) -> Result<PathBuf, WorkflowError> {
        let path = self
            .documents
            .write_text(&minutes_file_name(&thesis.id), &render_minutes(thesis))?;
        info!(thesis_id = %thesis.id, path = %path.display(), "Minutes generated");
        Ok(path)
    }
}
