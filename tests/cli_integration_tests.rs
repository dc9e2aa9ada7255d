// Integration tests for the thesis-desk command line

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn desk(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("thesis-desk").unwrap();
    cmd.current_dir(root)
        .arg("--root")
        .arg(root)
        .env("THESIS_DESK_CREDENTIALS__PBKDF2_ROUNDS", "1000")
        .env("THESIS_DESK_WORKFLOW__COOLING_OFF_DAYS", "0")
        .env_remove("THESIS_DESK_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn initialized() -> TempDir {
    let root = TempDir::new().unwrap();
    desk(root.path()).arg("init").assert().success();
    root
}

fn first_id(root: &Path, file: &str) -> String {
    let raw = fs::read_to_string(root.join("data").join(file)).unwrap();
    let records: serde_json::Value = serde_json::from_str(&raw).unwrap();
    records[0]["id"].as_str().unwrap().to_string()
}

#[test]
fn test_no_subcommand_shows_guidance() {
    let root = TempDir::new().unwrap();
    desk(root.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("thesis-desk init"))
        .stdout(predicate::str::contains("THESIS_DESK_PASSWORD"));
}

#[test]
fn test_config_reflects_environment_without_creating_storage() {
    let root = TempDir::new().unwrap();
    desk(root.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("cooling_off_days = 0"))
        .stdout(predicate::str::contains("pbkdf2_rounds = 1000"));
    assert!(!root.path().join("data").exists());
}

#[test]
fn test_init_seeds_once() {
    let root = TempDir::new().unwrap();
    desk(root.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded 4 demo users"));
    assert!(root.path().join("data").join("users.json").exists());
    assert!(root.path().join("files").is_dir());

    desk(root.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Users already present"));
}

#[test]
fn test_professors_lists_courses() {
    let root = initialized();
    desk(root.path())
        .arg("professors")
        .assert()
        .success()
        .stdout(predicate::str::contains("P2001"))
        .stdout(predicate::str::contains("T001"))
        .stdout(predicate::str::contains("P2002"));
}

#[test]
fn test_wrong_password_is_rejected() {
    let root = initialized();
    desk(root.path())
        .args(["requests", "--user", "S1001", "--password", "guess"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid credentials"));
}

#[test]
fn test_password_can_come_from_environment() {
    let root = initialized();
    desk(root.path())
        .env("THESIS_DESK_PASSWORD", "student123")
        .args(["requests", "--user", "S1001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not sent any supervision requests"));
}

#[test]
fn test_decide_request_needs_exactly_one_verdict() {
    let root = initialized();
    desk(root.path())
        .args(["decide-request", "-u", "P2001", "--password", "prof123", "--request", "x"])
        .assert()
        .failure();
    desk(root.path())
        .args([
            "decide-request", "-u", "P2001", "--password", "prof123", "--request", "x",
            "--approve", "--reject", "no",
        ])
        .assert()
        .failure();
}

#[test]
fn test_unoffered_course_is_reported() {
    let root = initialized();
    desk(root.path())
        .args([
            "request", "-u", "S1001", "--password", "student123", "--professor", "P2001",
            "--course", "T002",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("T002"));
}

#[test]
fn test_professor_cannot_decide_foreign_request() {
    let root = initialized();
    desk(root.path())
        .args([
            "request", "-u", "S1001", "--password", "student123", "--professor", "P2001",
            "--course", "T001",
        ])
        .assert()
        .success();
    let request_id = first_id(root.path(), "requests.json");

    desk(root.path())
        .args(["decide-request", "-u", "P2002", "--password", "prof123", "--request"])
        .arg(&request_id)
        .arg("--approve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("addressed to P2002"));
}

#[test]
fn test_full_workflow_through_the_cli() {
    let root = initialized();
    let path = root.path();

    desk(path)
        .args([
            "request", "-u", "S1001", "--password", "student123", "--professor", "P2001",
            "--course", "T001",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Supervision request sent"));
    let request_id = first_id(path, "requests.json");

    desk(path)
        .args(["inbox", "-u", "P2001", "--password", "prof123"])
        .assert()
        .success()
        .stdout(predicate::str::contains(request_id.as_str()));

    desk(path)
        .args(["decide-request", "-u", "P2001", "--password", "prof123", "--approve", "--request"])
        .arg(&request_id)
        .assert()
        .success()
        .stdout(predicate::str::contains("approved"));

    let document = path.join("draft.pdf");
    fs::write(&document, b"%PDF-1.7").unwrap();
    desk(path)
        .args([
            "submit-thesis", "-u", "S1001", "--password", "student123", "--title",
            "Consensus in practice", "--abstract", "Raft under load", "--keywords",
            "raft, consensus", "--year", "1404", "--semester", "دوم", "--request",
        ])
        .arg(&request_id)
        .arg("--file")
        .arg(&document)
        .assert()
        .success()
        .stdout(predicate::str::contains("Thesis registered"));
    let thesis_id = first_id(path, "theses.json");

    desk(path)
        .args(["search", "CONSENSUS"])
        .assert()
        .success()
        .stdout(predicate::str::contains(thesis_id.as_str()));

    desk(path)
        .args([
            "request-defense", "-u", "S1001", "--password", "student123", "--date",
            "2026-01-15", "--internal", "Dr. Karimi", "--external", "Dr. Ahmadi", "--thesis",
        ])
        .arg(&thesis_id)
        .assert()
        .success();
    let defense_id = first_id(path, "defenses.json");

    desk(path)
        .args(["decide-defense", "-u", "P2001", "--password", "prof123", "--approve", "--defense"])
        .arg(&defense_id)
        .assert()
        .success();

    desk(path)
        .args([
            "grade", "-u", "P2001", "--password", "prof123", "--guide", "18", "--internal",
            "16", "--external", "14", "--defense",
        ])
        .arg(&defense_id)
        .assert()
        .success()
        .stdout(predicate::str::contains("16.00"))
        .stdout(predicate::str::contains("defended"));

    let minutes = path.join("files").join(format!("minutes_{thesis_id}.txt"));
    let text = fs::read_to_string(minutes).unwrap();
    assert!(text.contains("Consensus in practice"));
}

#[test]
fn test_grade_rejects_non_numeric_scores() {
    let root = initialized();
    desk(root.path())
        .args([
            "grade", "-u", "P2001", "--password", "prof123", "--defense", "d1", "--guide",
            "eighteen", "--internal", "16", "--external", "14",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid score"));
}

#[test]
fn test_passwd_changes_login() {
    let root = initialized();
    desk(root.path())
        .args([
            "passwd", "-u", "S1002", "--password", "student123", "--new", "n3w", "--confirm",
            "n3w",
        ])
        .assert()
        .success();

    desk(root.path())
        .args(["requests", "-u", "S1002", "--password", "n3w"])
        .assert()
        .success();
    desk(root.path())
        .args(["requests", "-u", "S1002", "--password", "student123"])
        .assert()
        .failure();
}

#[test]
fn test_inbox_status_all_shows_decided_requests() {
    let root = initialized();
    let path = root.path();
    desk(path)
        .args([
            "request", "-u", "S1001", "--password", "student123", "--professor", "P2001",
            "--course", "T001",
        ])
        .assert()
        .success();
    let request_id = first_id(path, "requests.json");
    desk(path)
        .args(["decide-request", "-u", "P2001", "--password", "prof123", "--approve", "--request"])
        .arg(&request_id)
        .assert()
        .success();

    desk(path)
        .args(["inbox", "-u", "P2001", "--password", "prof123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending requests"));
    desk(path)
        .args(["inbox", "-u", "P2001", "--password", "prof123", "--status", "all"])
        .assert()
        .success()
        .stdout(predicate::str::contains(request_id.as_str()));
}
