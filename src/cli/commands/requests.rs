use anyhow::{bail, Result};

use super::Desk;
use crate::cli::{Login, RequestVerdict};
use crate::lifecycle::{RequestDecision, RequestStatus, Role, SupervisionRequest};

/// `all` lifts the filter
fn parse_status(raw: &str) -> Result<Option<RequestStatus>> {
    match raw.trim().to_lowercase().as_str() {
        "all" => Ok(None),
        "pending" => Ok(Some(RequestStatus::Pending)),
        "approved" => Ok(Some(RequestStatus::Approved)),
        "rejected" => Ok(Some(RequestStatus::Rejected)),
        other => bail!("Unknown request status '{other}' (expected pending, approved, rejected or all)"),
    }
}

fn status_icon(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Pending => "⏳",
        RequestStatus::Approved => "✅",
        RequestStatus::Rejected => "❌",
    }
}

fn print_request(request: &SupervisionRequest) {
    println!(
        "{} {} [{}] student {} → professor {} ({})",
        status_icon(request.status),
        request.id,
        request.status,
        request.student_id,
        request.professor_id,
        request.course_id
    );
    println!("   🕒 Created {}", request.created_at.format("%Y-%m-%d %H:%M"));
    if let Some(approved_at) = request.approved_at {
        println!("   🕒 Approved {}", approved_at.format("%Y-%m-%d %H:%M"));
    }
    if let Some(reason) = &request.rejection_reason {
        println!("   📝 Reason: {reason}");
    }
}

pub struct RequestCommand {
    pub login: Login,
    pub professor: String,
    pub course: String,
}

impl RequestCommand {
    pub fn execute(&self, desk: &Desk) -> Result<()> {
        let student = desk.login(&self.login, Role::Student)?;
        let request = desk
            .office()
            .submit_request(&student.id, &self.professor, &self.course)?;

        println!("📨 Supervision request sent");
        print_request(&request);
        Ok(())
    }
}

pub struct RequestsCommand {
    pub login: Login,
}

impl RequestsCommand {
    pub fn execute(&self, desk: &Desk) -> Result<()> {
        let student = desk.login(&self.login, Role::Student)?;
        let requests = desk.office().requests_for_student(&student.id)?;
        if requests.is_empty() {
            println!("📭 You have not sent any supervision requests yet");
            return Ok(());
        }
        for request in &requests {
            print_request(request);
        }
        Ok(())
    }
}

pub struct InboxCommand {
    pub login: Login,
    pub status: Option<String>,
}

impl InboxCommand {
    pub fn execute(&self, desk: &Desk) -> Result<()> {
        let status = match &self.status {
            Some(raw) => parse_status(raw)?,
            None => Some(RequestStatus::Pending),
        };
        let professor = desk.login(&self.login, Role::Professor)?;
        let requests = desk.office().requests_for_professor(&professor.id, status)?;

        let label = status.map_or_else(|| "supervision".to_string(), |s| s.to_string());
        if requests.is_empty() {
            println!("📭 No {label} requests");
            return Ok(());
        }
        println!("📥 {} {label} request(s)", requests.len());
        for request in &requests {
            print_request(request);
        }
        Ok(())
    }
}

pub struct DecideRequestCommand {
    pub login: Login,
    pub request: String,
    pub verdict: RequestVerdict,
}

impl DecideRequestCommand {
    pub fn execute(&self, desk: &Desk) -> Result<()> {
        let professor = desk.login(&self.login, Role::Professor)?;
        let office = desk.office();

        let addressed = office
            .requests_for_professor(&professor.id, None)?
            .iter()
            .any(|r| r.id == self.request);
        if !addressed {
            bail!("No supervision request {} is addressed to {}", self.request, professor.id);
        }

        let decision = match &self.verdict.reject {
            Some(reason) => RequestDecision::Reject {
                reason: reason.clone(),
            },
            None => RequestDecision::Approve,
        };
        let request = office.decide_request(&self.request, decision)?;

        println!("{} Request {}", status_icon(request.status), request.status);
        print_request(&request);
        Ok(())
    }
}

pub struct ResubmitCommand {
    pub login: Login,
    pub request: String,
}

impl ResubmitCommand {
    pub fn execute(&self, desk: &Desk) -> Result<()> {
        let student = desk.login(&self.login, Role::Student)?;
        let office = desk.office();

        let owned = office
            .requests_for_student(&student.id)?
            .iter()
            .any(|r| r.id == self.request);
        if !owned {
            bail!("No supervision request {} belongs to {}", self.request, student.id);
        }

        let request = office.resubmit(&self.request)?;
        println!("🔁 Request sent back for review");
        print_request(&request);
        Ok(())
    }
}
