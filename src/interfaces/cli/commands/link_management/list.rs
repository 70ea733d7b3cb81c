//! List links command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::runtime::AppContext;
use crate::services::LinkStatus;
use crate::utils::fmt_date;

pub async fn list_links(ctx: &AppContext) -> Result<(), CliError> {
    let rows = ctx.stats.rows().await;

    if rows.is_empty() {
        println!("{} No short links found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Short link list:".bold().green());
    println!();
    for row in &rows {
        let status = match row.status {
            LinkStatus::Active => row.status.label().green(),
            LinkStatus::Expired => row.status.label().red(),
        };
        println!(
            "  {} -> {} {} {} {}",
            row.code.cyan(),
            row.url.blue().underline(),
            format!("(expires: {})", fmt_date(row.expires_at))
                .dimmed()
                .yellow(),
            status,
            format!("(clicks: {})", row.total_clicks).dimmed().cyan()
        );
    }
    println!();
    println!(
        "{} Total {} short links",
        "ℹ".bold().blue(),
        rows.len().to_string().green()
    );
    Ok(())
}
