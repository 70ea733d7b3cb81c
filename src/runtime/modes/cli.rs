//! CLI mode

use crate::cli::Commands;
use crate::config::Config;
use crate::interfaces::cli::CliError;

/// Run one CLI command against the configured store
pub async fn run_cli(command: Commands, config: &Config) -> Result<(), CliError> {
    crate::interfaces::cli::run_cli_command(command, config).await
}
