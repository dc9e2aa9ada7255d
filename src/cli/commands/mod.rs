use anyhow::Result;
use chrono::Duration;

use crate::cli::{Commands, Login};
use crate::config::ThesisDeskConfig;
use crate::credentials::Pbkdf2Credentials;
use crate::documents::FsDocumentStore;
use crate::lifecycle::{Accounts, Role, SystemClock, ThesisOffice, User};
use crate::store::JsonFileStore;
use crate::telemetry::{create_workflow_span, generate_correlation_id};

pub mod accounts;
pub mod defenses;
pub mod init;
pub mod requests;
pub mod theses;

use accounts::{ConfigCommand, PasswdCommand, ProfessorsCommand};
use defenses::{DecideDefenseCommand, DefensesCommand, GradeCommand, RequestDefenseCommand};
use init::InitCommand;
use requests::{DecideRequestCommand, InboxCommand, RequestCommand, RequestsCommand, ResubmitCommand};
use theses::{SearchCommand, SubmitThesisCommand, ThesesCommand};

pub type DeskOffice<'a> = ThesisOffice<&'a JsonFileStore, FsDocumentStore, SystemClock>;
pub type DeskAccounts<'a> = Accounts<&'a JsonFileStore, Pbkdf2Credentials>;

/// Production wiring: JSON records, files on disk, the system clock
pub struct Desk {
    config: ThesisDeskConfig,
    store: JsonFileStore,
    documents: FsDocumentStore,
    credentials: Pbkdf2Credentials,
}

impl Desk {
    pub fn open(config: ThesisDeskConfig) -> Result<Self> {
        let store = JsonFileStore::open(config.storage.data_dir())?;
        store.ensure_collections()?;
        let documents = FsDocumentStore::new(config.storage.files_dir());
        let credentials = Pbkdf2Credentials::new(config.credentials.pbkdf2_rounds);

        Ok(Self {
            config,
            store,
            documents,
            credentials,
        })
    }

    pub fn config(&self) -> &ThesisDeskConfig {
        &self.config
    }

    pub fn office(&self) -> DeskOffice<'_> {
        ThesisOffice::new(&self.store, self.documents.clone(), SystemClock)
            .with_cooling_off(Duration::days(self.config.workflow.cooling_off_days))
    }

    pub fn accounts(&self) -> DeskAccounts<'_> {
        Accounts::new(&self.store, self.credentials)
    }

    pub fn login(&self, login: &Login, role: Role) -> Result<User> {
        Ok(self
            .accounts()
            .authenticate(&login.user, &login.password, role)?)
    }
}

/// Run one command inside its own workflow span
pub fn run(command: Option<Commands>, config: ThesisDeskConfig) -> Result<()> {
    let Some(command) = command else {
        show_how_to_get_started();
        return Ok(());
    };

    let correlation_id = generate_correlation_id();
    let span = create_workflow_span(command.name(), command.actor(), &correlation_id);
    let _guard = span.enter();

    match command {
        // Printing the configuration must not create the data directory
        Commands::Config => ConfigCommand::new(config).execute(),
        command => dispatch(command, &Desk::open(config)?),
    }
}

fn dispatch(command: Commands, desk: &Desk) -> Result<()> {
    match command {
        Commands::Init { no_seed } => {
            let init = InitCommand::new();
            let init = if no_seed { init.without_seed() } else { init };
            init.execute(desk)
        }
        Commands::Config => ConfigCommand::new(desk.config().clone()).execute(),
        Commands::Professors => ProfessorsCommand.execute(desk),
        Commands::Request {
            login,
            professor,
            course,
        } => RequestCommand {
            login,
            professor,
            course,
        }
        .execute(desk),
        Commands::Requests { login } => RequestsCommand { login }.execute(desk),
        Commands::Inbox { login, status } => InboxCommand { login, status }.execute(desk),
        Commands::DecideRequest {
            login,
            request,
            verdict,
        } => DecideRequestCommand {
            login,
            request,
            verdict,
        }
        .execute(desk),
        Commands::Resubmit { login, request } => ResubmitCommand { login, request }.execute(desk),
        Commands::SubmitThesis {
            login,
            request,
            title,
            summary,
            keywords,
            file,
            year,
            semester,
        } => SubmitThesisCommand {
            login,
            request,
            title,
            summary,
            keywords,
            file,
            year,
            semester,
        }
        .execute(desk),
        Commands::Theses { login } => ThesesCommand { login }.execute(desk),
        Commands::RequestDefense {
            login,
            thesis,
            date,
            internal,
            external,
        } => RequestDefenseCommand {
            login,
            thesis,
            date,
            internal,
            external,
        }
        .execute(desk),
        Commands::Defenses { login } => DefensesCommand { login }.execute(desk),
        Commands::DecideDefense {
            login,
            defense,
            verdict,
        } => DecideDefenseCommand {
            login,
            defense,
            verdict,
        }
        .execute(desk),
        Commands::Grade {
            login,
            defense,
            guide,
            internal,
            external,
        } => GradeCommand {
            login,
            defense,
            guide,
            internal,
            external,
        }
        .execute(desk),
        Commands::Search { query } => SearchCommand { query }.execute(desk),
        Commands::Passwd {
            login,
            new_password,
            confirm,
        } => PasswdCommand {
            login,
            new_password,
            confirm,
        }
        .execute(desk),
    }
}

pub fn show_how_to_get_started() {
    println!("🎓 Thesis Desk - thesis lifecycle from request to grade");
    println!();
    println!("To get started:");
    println!("  ⚙️  thesis-desk init              # Create data directories and demo users");
    println!("  👨‍🏫 thesis-desk professors        # See who supervises which course");
    println!();
    println!("Students:");
    println!("  📨 thesis-desk request           # Ask a professor for supervision");
    println!("  📄 thesis-desk submit-thesis     # Register your thesis");
    println!("  🗓️  thesis-desk request-defense   # Ask for a defense session");
    println!();
    println!("Professors:");
    println!("  📥 thesis-desk inbox             # Pending supervision requests");
    println!("  ✅ thesis-desk decide-request    # Approve or reject a request");
    println!("  🧑‍⚖️ thesis-desk grade             # Record defense scores");
    println!();
    println!("💡 Pass --password or set THESIS_DESK_PASSWORD for commands that log in.");
}
