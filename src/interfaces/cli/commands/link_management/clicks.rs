//! Click log command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::runtime::AppContext;
use crate::utils::fmt_date;

pub async fn list_clicks(ctx: &AppContext, code: String) -> Result<(), CliError> {
    if ctx.link_service.get_link(&code).await.is_none() {
        return Err(CliError::CommandError(format!(
            "Short link does not exist: {}",
            code
        )));
    }

    let clicks = ctx.link_service.get_clicks(&code).await;
    if clicks.is_empty() {
        println!("{} No clicks recorded for {}", "ℹ".bold().blue(), code.cyan());
        return Ok(());
    }

    println!("{} {}", "Clicks for".bold().green(), code.cyan());
    for click in &clicks {
        println!(
            "  {}  {}  {}",
            fmt_date(Some(click.timestamp)).yellow(),
            click.source.blue(),
            click.location.dimmed()
        );
    }
    println!(
        "{} Total {} clicks",
        "ℹ".bold().blue(),
        clicks.len().to_string().green()
    );
    Ok(())
}
