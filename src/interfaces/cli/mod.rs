//! CLI interface module

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::config::Config;
use crate::errors::LinkStashError;
use crate::runtime::AppContext;
use crate::store::DispatchContext;
use commands::{
    add_links, clear_logs, config_management, list_clicks, list_links, show_logs, sweep_expired,
};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<LinkStashError> for CliError {
    fn from(err: LinkStashError) -> Self {
        CliError::StorageError(err.to_string())
    }
}

/// Route recorded in the action log for CLI dispatches
pub(crate) fn cli_context(command: &str) -> DispatchContext {
    DispatchContext::new(format!("cli:{}", command))
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands, config: &Config) -> Result<(), CliError> {
    // Generate doesn't touch storage
    if let Commands::Config { action } = cmd {
        let ConfigCommands::Generate { output_path, force } = action;
        return config_management::config_generate(output_path, force).await;
    }

    let ctx = AppContext::prepare(config).await?;

    match cmd {
        Commands::Add {
            urls,
            code,
            validity,
        } => add_links(&ctx, urls, code, validity).await,

        Commands::List => list_links(&ctx).await,

        Commands::Clicks { code } => list_clicks(&ctx, code).await,

        Commands::Logs => show_logs(&ctx).await,

        Commands::ClearLogs => clear_logs(&ctx).await,

        Commands::Sweep => sweep_expired(&ctx).await,

        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server entry point".to_string(),
        )),

        Commands::Config { .. } => unreachable!("handled above"),
    }
}
