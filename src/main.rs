use anyhow::Result;
use clap::Parser;

use thesis_desk::cli::{commands, Cli};
use thesis_desk::config::ThesisDeskConfig;
use thesis_desk::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();

    ThesisDeskConfig::load_env_file()?;
    let mut config = ThesisDeskConfig::load()?;
    if let Some(root) = cli.root {
        config.storage.root = root;
    }

    init_telemetry(&config.observability)?;

    commands::run(cli.command, config)
}
