pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::Target;
use crate::cli::fetch::DateRange;
use crate::cli::info::InfoCommand;
use crate::core::config::AppConfig;
use crate::providers::GrandExchangeProvider;
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Info(InfoCommand),
    Poll(Target),
    Fetch(DateRange, Target),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Grand exchanger starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = GrandExchangeProvider::from_config(&config)?;
    let mut out = std::io::stdout();

    match command {
        AppCommand::Info(cmd) => cli::info::run(&provider, cmd, &mut out).await,
        AppCommand::Poll(target) => cli::poll::run(&provider, target, &mut out).await,
        AppCommand::Fetch(range, target) => cli::fetch::run(&provider, range, target, &mut out).await,
    }
}
