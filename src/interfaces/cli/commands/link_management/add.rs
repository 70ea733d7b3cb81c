//! Add links command

use colored::Colorize;

use crate::interfaces::cli::{CliError, cli_context};
use crate::runtime::AppContext;
use crate::services::CreateLinkItem;
use crate::utils::fmt_date;

pub async fn add_links(
    ctx: &AppContext,
    urls: Vec<String>,
    code: Option<String>,
    validity: Option<String>,
) -> Result<(), CliError> {
    if code.is_some() && urls.len() > 1 {
        return Err(CliError::ParseError(
            "--code can only be used with a single URL".to_string(),
        ));
    }

    let max_batch = ctx.link_service.config().max_batch;
    if urls.len() > max_batch {
        println!(
            "{} Only the first {} URLs are used",
            "ℹ".bold().blue(),
            max_batch.to_string().yellow()
        );
    }

    let items = urls
        .into_iter()
        .map(|url| {
            let mut item = CreateLinkItem::new(url);
            if let Some(ref mins) = validity {
                item = item.with_validity(mins);
            }
            if let Some(ref code) = code {
                item = item.with_code(code.clone());
            }
            item
        })
        .collect();

    let result = ctx
        .link_service
        .create_many(items, &cli_context("add"))
        .await?;

    let public_host = &ctx.link_service.config().public_host;
    for link in &result.results {
        println!(
            "{} Added short link: {} -> {} (expires: {})",
            "✓".bold().green(),
            link.short_url(public_host).cyan(),
            link.url.blue().underline(),
            fmt_date(link.expires_at).yellow()
        );
    }

    for err in &result.errors {
        match err.index {
            Some(index) => println!(
                "{} URL #{}: {}",
                "✗".bold().red(),
                index + 1,
                err.message.red()
            ),
            None => println!("{} {}", "✗".bold().red(), err.message.red()),
        }
    }

    if result.results.is_empty() {
        return Err(CliError::CommandError(format!(
            "No links created ({} errors)",
            result.errors.len()
        )));
    }

    Ok(())
}
