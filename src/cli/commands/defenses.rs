use anyhow::{bail, Result};

use super::Desk;
use crate::cli::{DefenseVerdict, Login};
use crate::lifecycle::{parse_score, DefenseDecision, DefenseRequest, DefenseStatus, Role};

fn print_defense(defense: &DefenseRequest) {
    let icon = match defense.status {
        DefenseStatus::Pending => "⏳",
        DefenseStatus::Approved => "✅",
        DefenseStatus::Rejected => "❌",
    };
    println!(
        "{icon} {} [{}] thesis {} on {}",
        defense.id,
        defense.status,
        defense.thesis_id,
        defense.requested_date.format("%Y-%m-%d")
    );
    println!(
        "   🧑‍⚖️ Internal: {}  External: {}",
        defense.internal_judge, defense.external_judge
    );
    if let Some(scores) = &defense.scores {
        println!(
            "   📊 {} / {} / {} → {:.2} ({})",
            scores.guide, scores.internal, scores.external, scores.average, scores.letter
        );
    }
    if let Some(result) = defense.result {
        println!("   🏁 {result}");
    }
}

pub struct RequestDefenseCommand {
    pub login: Login,
    pub thesis: String,
    pub date: String,
    pub internal: String,
    pub external: String,
}

impl RequestDefenseCommand {
    pub fn execute(&self, desk: &Desk) -> Result<()> {
        let student = desk.login(&self.login, Role::Student)?;
        let office = desk.office();

        let owned = office
            .theses_for_student(&student.id)?
            .iter()
            .any(|t| t.id == self.thesis);
        if !owned {
            bail!("No thesis {} belongs to {}", self.thesis, student.id);
        }

        let defense =
            office.request_defense(&self.thesis, &self.date, &self.internal, &self.external)?;
        println!("🗓️  Defense requested");
        print_defense(&defense);
        Ok(())
    }
}

pub struct DefensesCommand {
    pub login: Login,
}

impl DefensesCommand {
    pub fn execute(&self, desk: &Desk) -> Result<()> {
        let professor = desk.login(&self.login, Role::Professor)?;
        let defenses = desk.office().defenses_for_professor(&professor.id)?;
        if defenses.is_empty() {
            println!("📭 No defense requests for your theses");
            return Ok(());
        }
        for defense in &defenses {
            print_defense(defense);
        }
        Ok(())
    }
}

/// Fail unless the defense belongs to a thesis the professor supervises
fn ensure_supervised(desk: &Desk, professor_id: &str, defense_id: &str) -> Result<()> {
    let supervised = desk
        .office()
        .defenses_for_professor(professor_id)?
        .iter()
        .any(|d| d.id == defense_id);
    if !supervised {
        bail!("No defense request {defense_id} for a thesis supervised by {professor_id}");
    }
    Ok(())
}

pub struct DecideDefenseCommand {
    pub login: Login,
    pub defense: String,
    pub verdict: DefenseVerdict,
}

impl DecideDefenseCommand {
    pub fn execute(&self, desk: &Desk) -> Result<()> {
        let professor = desk.login(&self.login, Role::Professor)?;
        ensure_supervised(desk, &professor.id, &self.defense)?;

        let decision = if self.verdict.approve {
            DefenseDecision::Approve
        } else {
            DefenseDecision::Reject
        };
        let defense = desk.office().decide_defense(&self.defense, decision)?;
        print_defense(&defense);
        Ok(())
    }
}

pub struct GradeCommand {
    pub login: Login,
    pub defense: String,
    pub guide: String,
    pub internal: String,
    pub external: String,
}

impl GradeCommand {
    pub fn execute(&self, desk: &Desk) -> Result<()> {
        let guide = parse_score(&self.guide)?;
        let internal = parse_score(&self.internal)?;
        let external = parse_score(&self.external)?;

        let professor = desk.login(&self.login, Role::Professor)?;
        ensure_supervised(desk, &professor.id, &self.defense)?;

        let outcome = desk
            .office()
            .record_scores(&self.defense, guide, internal, external)?;

        println!("🏁 Scores recorded");
        print_defense(&outcome.defense);
        super::theses::print_thesis(&outcome.thesis);
        println!("   📝 Minutes: {}", outcome.minutes.display());
        Ok(())
    }
}
