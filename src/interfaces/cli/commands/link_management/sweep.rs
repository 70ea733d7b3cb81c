//! Expiry sweep command

use colored::Colorize;

use crate::interfaces::cli::{CliError, cli_context};
use crate::runtime::AppContext;

pub async fn sweep_expired(ctx: &AppContext) -> Result<(), CliError> {
    let removed = ctx.link_service.clear_expired(&cli_context("sweep")).await?;
    println!(
        "{} Removed {} expired links",
        "✓".bold().green(),
        removed.to_string().yellow()
    );
    Ok(())
}
