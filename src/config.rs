use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::credentials::DEFAULT_PBKDF2_ROUNDS;
use crate::lifecycle::DEFAULT_COOLING_OFF_DAYS;

/// Main configuration structure for Thesis Desk
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ThesisDeskConfig {
    /// Where records and documents live
    pub storage: StorageConfig,
    /// Lifecycle rules
    pub workflow: WorkflowConfig,
    /// Password hashing
    pub credentials: CredentialConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory; records go to `<root>/data`, documents to `<root>/files`
    pub root: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Days between supervision approval and the earliest defense request
    pub cooling_off_days: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// PBKDF2 iterations for newly hashed passwords
    pub pbkdf2_rounds: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON log lines instead of compact text
    pub json_logs: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            cooling_off_days: DEFAULT_COOLING_OFF_DAYS,
        }
    }
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            pbkdf2_rounds: DEFAULT_PBKDF2_ROUNDS,
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json_logs: false,
        }
    }
}

impl StorageConfig {
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn files_dir(&self) -> PathBuf {
        self.root.join("files")
    }
}

impl ThesisDeskConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (thesis-desk.toml)
    /// 3. Environment variables (prefixed with THESIS_DESK_, `__` between sections)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new("thesis-desk.toml").exists() {
            builder = builder.add_source(File::with_name("thesis-desk"));
        }

        builder = builder.add_source(
            Environment::with_prefix("THESIS_DESK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let thesis_desk_config: ThesisDeskConfig = config.try_deserialize()?;
        Ok(thesis_desk_config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}
