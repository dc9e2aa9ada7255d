use std::path::PathBuf;

use anyhow::{anyhow, Result};

use super::Desk;
use crate::cli::Login;
use crate::lifecycle::{Role, Thesis, ThesisSubmission};

pub(super) fn print_thesis(thesis: &Thesis) {
    println!("📄 {} - {}", thesis.id, thesis.title);
    println!(
        "   🎓 {} supervised by {} ({} {})",
        thesis.student_id, thesis.professor_id, thesis.year, thesis.semester
    );
    if !thesis.keywords.is_empty() {
        println!("   🏷️  {}", thesis.keywords.join(", "));
    }
    if let (Some(grade), Some(letter)) = (thesis.grade_numeric, thesis.grade_letter) {
        println!("   🏁 Grade {grade:.2} ({letter})");
    }
    if let Some(result) = thesis.defense_result {
        println!("   🧑‍⚖️ Defense: {result}");
    }
}

pub struct SubmitThesisCommand {
    pub login: Login,
    pub request: String,
    pub title: String,
    pub summary: String,
    pub keywords: String,
    pub file: PathBuf,
    pub year: String,
    pub semester: String,
}

impl SubmitThesisCommand {
    pub fn execute(&self, desk: &Desk) -> Result<()> {
        let student = desk.login(&self.login, Role::Student)?;
        let office = desk.office();

        // The supervising professor comes from the chosen approved request
        let request = office
            .approved_requests_for_student(&student.id)?
            .into_iter()
            .find(|r| r.id == self.request)
            .ok_or_else(|| anyhow!("No approved supervision request {} for {}", self.request, student.id))?;

        let thesis = office.submit_thesis(ThesisSubmission {
            student_id: student.id,
            professor_id: request.professor_id,
            title: self.title.clone(),
            summary: self.summary.clone(),
            keywords: self.keywords.clone(),
            document: self.file.clone(),
            year: self.year.clone(),
            semester: self.semester.clone(),
        })?;

        println!("✅ Thesis registered");
        print_thesis(&thesis);
        println!("   📎 Stored as {}", thesis.document);
        Ok(())
    }
}

pub struct ThesesCommand {
    pub login: Login,
}

impl ThesesCommand {
    pub fn execute(&self, desk: &Desk) -> Result<()> {
        let student = desk.login(&self.login, Role::Student)?;
        let theses = desk.office().theses_for_student(&student.id)?;
        if theses.is_empty() {
            println!("📭 No theses registered yet");
            return Ok(());
        }
        for thesis in &theses {
            print_thesis(thesis);
        }
        Ok(())
    }
}

pub struct SearchCommand {
    pub query: String,
}

impl SearchCommand {
    pub fn execute(&self, desk: &Desk) -> Result<()> {
        let theses = desk.office().search_theses(&self.query)?;
        if theses.is_empty() {
            println!("🔍 No theses match '{}'", self.query);
            return Ok(());
        }
        println!("🔍 {} match(es) for '{}'", theses.len(), self.query);
        for thesis in &theses {
            print_thesis(thesis);
        }
        Ok(())
    }
}
