//! Action log commands

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::runtime::AppContext;
use crate::utils::fmt_date;

pub async fn show_logs(ctx: &AppContext) -> Result<(), CliError> {
    let logs = ctx.action_log.get_all_logs().await;
    if logs.is_empty() {
        println!("{} Action log is empty", "ℹ".bold().blue());
        return Ok(());
    }

    for entry in logs.iter().rev() {
        println!(
            "  {}  {}  [{}]  {}",
            fmt_date(Some(entry.ts)).yellow(),
            entry.action_type.cyan(),
            entry.payload_shape.join(", "),
            entry.route.dimmed()
        );
    }
    Ok(())
}

pub async fn clear_logs(ctx: &AppContext) -> Result<(), CliError> {
    ctx.action_log.clear_logs().await?;
    println!("{} Action log cleared", "✓".bold().green());
    Ok(())
}
