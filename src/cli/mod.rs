use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(name = "thesis-desk")]
#[command(about = "Track theses from supervision request to final grade")]
#[command(long_about = "Thesis Desk tracks the lifecycle of a thesis: a student asks a professor for \
                       supervision, submits the thesis once approved, requests a defense after the \
                       cooling-off period, and the professor records the final grade. Start with \
                       'thesis-desk init' to create the data directories and demo users.")]
pub struct Cli {
    /// Storage root (overrides storage.root)
    #[arg(long, global = true, help = "Directory holding data/ and files/")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Credentials of the acting user
#[derive(Args, Debug, Clone)]
pub struct Login {
    #[arg(long, short = 'u', help = "Your user id")]
    pub user: String,
    #[arg(long, env = "THESIS_DESK_PASSWORD", hide_env_values = true, help = "Your password")]
    pub password: String,
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct RequestVerdict {
    #[arg(long, help = "Approve the request")]
    pub approve: bool,
    #[arg(long, value_name = "REASON", help = "Reject the request with a reason")]
    pub reject: Option<String>,
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct DefenseVerdict {
    #[arg(long, help = "Approve the defense request")]
    pub approve: bool,
    #[arg(long, help = "Reject the defense request")]
    pub reject: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create data directories and seed demo users when none exist
    Init {
        #[arg(long, help = "Create the directories without seeding demo users")]
        no_seed: bool,
    },
    /// Print the effective configuration as TOML
    Config,
    /// List professors and the courses they supervise
    Professors,
    /// Ask a professor to supervise your thesis (student)
    Request {
        #[command(flatten)]
        login: Login,
        #[arg(long, help = "Professor id")]
        professor: String,
        #[arg(long, help = "Course id offered by the professor")]
        course: String,
    },
    /// Show your supervision requests (student)
    Requests {
        #[command(flatten)]
        login: Login,
    },
    /// Show supervision requests addressed to you (professor)
    Inbox {
        #[command(flatten)]
        login: Login,
        #[arg(long, help = "Status filter: pending (default), approved, rejected or all")]
        status: Option<String>,
    },
    /// Approve or reject a supervision request (professor)
    DecideRequest {
        #[command(flatten)]
        login: Login,
        #[arg(long, help = "Supervision request id")]
        request: String,
        #[command(flatten)]
        verdict: RequestVerdict,
    },
    /// Send a rejected request back for review (student)
    Resubmit {
        #[command(flatten)]
        login: Login,
        #[arg(long, help = "Rejected supervision request id")]
        request: String,
    },
    /// Register your thesis under an approved request (student)
    SubmitThesis {
        #[command(flatten)]
        login: Login,
        #[arg(long, help = "Approved supervision request id")]
        request: String,
        #[arg(long)]
        title: String,
        #[arg(long = "abstract")]
        summary: String,
        #[arg(long, default_value = "", help = "Comma-separated keywords")]
        keywords: String,
        #[arg(long, help = "Path of the thesis document")]
        file: PathBuf,
        #[arg(long, help = "Academic year, e.g. 1404")]
        year: String,
        #[arg(long, help = "Semester label")]
        semester: String,
    },
    /// Show your registered theses (student)
    Theses {
        #[command(flatten)]
        login: Login,
    },
    /// Request a defense session (student)
    RequestDefense {
        #[command(flatten)]
        login: Login,
        #[arg(long, help = "Thesis id")]
        thesis: String,
        #[arg(long, help = "Proposed date, YYYY-MM-DD")]
        date: String,
        #[arg(long, help = "Internal judge name or id")]
        internal: String,
        #[arg(long, help = "External judge name or id")]
        external: String,
    },
    /// Show defense requests for theses you supervise (professor)
    Defenses {
        #[command(flatten)]
        login: Login,
    },
    /// Approve or reject a defense request (professor)
    DecideDefense {
        #[command(flatten)]
        login: Login,
        #[arg(long, help = "Defense request id")]
        defense: String,
        #[command(flatten)]
        verdict: DefenseVerdict,
    },
    /// Record the three examiner scores and generate the minutes (professor)
    Grade {
        #[command(flatten)]
        login: Login,
        #[arg(long, help = "Approved defense request id")]
        defense: String,
        #[arg(long, help = "Supervisor score (0-20)")]
        guide: String,
        #[arg(long, help = "Internal judge score (0-20)")]
        internal: String,
        #[arg(long, help = "External judge score (0-20)")]
        external: String,
    },
    /// Search theses by title, keyword, author id or year
    Search {
        query: String,
    },
    /// Change your password
    Passwd {
        #[command(flatten)]
        login: Login,
        #[arg(long = "new", help = "New password")]
        new_password: String,
        #[arg(long, help = "New password again")]
        confirm: String,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Init { .. } => "init",
            Commands::Config => "config",
            Commands::Professors => "professors",
            Commands::Request { .. } => "request",
            Commands::Requests { .. } => "requests",
            Commands::Inbox { .. } => "inbox",
            Commands::DecideRequest { .. } => "decide-request",
            Commands::Resubmit { .. } => "resubmit",
            Commands::SubmitThesis { .. } => "submit-thesis",
            Commands::Theses { .. } => "theses",
            Commands::RequestDefense { .. } => "request-defense",
            Commands::Defenses { .. } => "defenses",
            Commands::DecideDefense { .. } => "decide-defense",
            Commands::Grade { .. } => "grade",
            Commands::Search { .. } => "search",
            Commands::Passwd { .. } => "passwd",
        }
    }

    /// Acting user id, for commands that log in
    pub fn actor(&self) -> Option<&str> {
        match self {
            Commands::Request { login, .. }
            | Commands::Requests { login }
            | Commands::Inbox { login, .. }
            | Commands::DecideRequest { login, .. }
            | Commands::Resubmit { login, .. }
            | Commands::SubmitThesis { login, .. }
            | Commands::Theses { login }
            | Commands::RequestDefense { login, .. }
            | Commands::Defenses { login }
            | Commands::DecideDefense { login, .. }
            | Commands::Grade { login, .. }
            | Commands::Passwd { login, .. } => Some(login.user.as_str()),
            Commands::Init { .. } | Commands::Config | Commands::Professors | Commands::Search { .. } => None,
        }
    }
}
