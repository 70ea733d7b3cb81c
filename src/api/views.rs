//! Server-rendered HTML pages

use std::fmt::Write;

use crate::services::{BatchError, LinkStatsRow};
use crate::storage::{LogEntry, ShortLink};
use crate::utils::{escape_html, fmt_date};

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem;color:#222}\
table{border-collapse:collapse;width:100%;margin:1rem 0}\
th,td{border:1px solid #ddd;padding:.4rem .6rem;text-align:left;vertical-align:top}\
th{background:#f5f5f5}\
.error{color:#b00020}\
.ok{color:#1b5e20}\
.muted{color:#777;font-size:.9em}\
nav a{margin-right:1rem}\
input{padding:.3rem}";

/// One row of the creation form, echoed back after a submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormRow {
    pub url: String,
    pub validity: String,
    pub code: String,
}

/// A rejected form row; `row` is 1-based, absent for batch-level errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError {
    pub row: Option<usize>,
    pub message: String,
}

/// What a form submission produced
#[derive(Debug, Clone, Default)]
pub struct FormOutcome {
    pub created: Vec<ShortLink>,
    pub errors: Vec<FormError>,
}

impl FormOutcome {
    /// Maps batch indexes back onto the form rows they came from
    pub fn from_batch(created: Vec<ShortLink>, errors: Vec<BatchError>, row_numbers: &[usize]) -> Self {
        let errors = errors
            .into_iter()
            .map(|e| FormError {
                row: e.index.and_then(|i| row_numbers.get(i).copied()),
                message: e.message,
            })
            .collect();
        Self { created, errors }
    }
}

pub fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} · linkstash</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <nav><a href=\"/\">Shorten</a><a href=\"/stats\">Statistics</a></nav>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

/// Creation form with `rows.len()` input rows and the outcome of the
/// previous submission, if any.
pub fn form_page(
    rows: &[FormRow],
    outcome: Option<&FormOutcome>,
    public_host: &str,
    default_validity_mins: u32,
) -> String {
    let mut body = String::from("<h1>Shorten URLs</h1>\n");

    if let Some(outcome) = outcome {
        body.push_str(&outcome_section(outcome, public_host));
    }

    let _ = write!(
        body,
        "<form method=\"post\" action=\"/\">\n<table>\n<tr><th>#</th><th>Long URL</th>\
         <th>Validity (minutes)</th><th>Custom shortcode</th></tr>\n"
    );
    for (i, row) in rows.iter().enumerate() {
        let n = i + 1;
        let _ = writeln!(
            body,
            "<tr><td>{n}</td>\
             <td><input type=\"text\" name=\"url_{n}\" size=\"48\" placeholder=\"https://example.com/page\" value=\"{url}\"></td>\
             <td><input type=\"text\" name=\"validity_{n}\" size=\"6\" placeholder=\"{default_validity_mins}\" value=\"{validity}\"></td>\
             <td><input type=\"text\" name=\"code_{n}\" size=\"16\" placeholder=\"optional\" value=\"{code}\"></td></tr>",
            url = escape_html(&row.url),
            validity = escape_html(&row.validity),
            code = escape_html(&row.code),
        );
    }
    let _ = write!(
        body,
        "</table>\n<button type=\"submit\">Shorten</button>\n</form>\n\
         <p class=\"muted\">Up to {} URLs per submission. Blank validity defaults to {} minutes. \
         Custom shortcodes are 4-32 letters or digits.</p>",
        rows.len(),
        default_validity_mins
    );

    layout("Shorten", &body)
}

fn outcome_section(outcome: &FormOutcome, public_host: &str) -> String {
    let mut out = String::new();

    if !outcome.errors.is_empty() {
        out.push_str("<ul class=\"error\">\n");
        for err in &outcome.errors {
            let message = escape_html(&err.message);
            let _ = match err.row {
                Some(row) => writeln!(out, "<li>Row {}: {}</li>", row, message),
                None => writeln!(out, "<li>{}</li>", message),
            };
        }
        out.push_str("</ul>\n");
    }

    if !outcome.created.is_empty() {
        out.push_str(
            "<h2 class=\"ok\">Created</h2>\n<table>\n<tr><th>Short URL</th><th>Target</th><th>Expires</th></tr>\n",
        );
        for link in &outcome.created {
            let short = escape_html(&link.short_url(public_host));
            let _ = writeln!(
                out,
                "<tr><td><a href=\"{short}\">{short}</a></td><td>{}</td><td>{}</td></tr>",
                escape_html(&link.url),
                fmt_date(link.expires_at),
            );
        }
        out.push_str("</table>\n");
    }

    out
}

/// Statistics listing plus the action log, newest entries first
pub fn stats_page(rows: &[LinkStatsRow], logs: &[LogEntry]) -> String {
    let mut body = String::from("<h1>Statistics</h1>\n");

    if rows.is_empty() {
        body.push_str("<p class=\"muted\">No links yet.</p>\n");
    } else {
        body.push_str(
            "<table>\n<tr><th>Short URL</th><th>Target</th><th>Created</th><th>Expires</th>\
             <th>Status</th><th>Clicks</th></tr>\n",
        );
        for row in rows {
            let short = escape_html(&row.short_url);
            let _ = writeln!(
                body,
                "<tr><td><a href=\"{short}\">{short}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&row.url),
                fmt_date(Some(row.created_at)),
                fmt_date(row.expires_at),
                row.status.label(),
                row.total_clicks,
            );
            if !row.clicks.is_empty() {
                body.push_str("<tr><td colspan=\"6\"><details><summary>Click detail</summary>\n<table>\n");
                body.push_str("<tr><th>When</th><th>Source</th><th>Location</th></tr>\n");
                for click in &row.clicks {
                    let _ = writeln!(
                        body,
                        "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                        fmt_date(Some(click.timestamp)),
                        escape_html(&click.source),
                        escape_html(&click.location),
                    );
                }
                body.push_str("</table>\n</details></td></tr>\n");
            }
        }
        body.push_str("</table>\n");
    }

    body.push_str("<h2>Action log</h2>\n");
    if logs.is_empty() {
        body.push_str("<p class=\"muted\">Empty.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>When</th><th>Action</th><th>Payload</th><th>Route</th></tr>\n");
        for entry in logs.iter().rev() {
            let _ = writeln!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                fmt_date(Some(entry.ts)),
                escape_html(&entry.action_type),
                escape_html(&entry.payload_shape.join(", ")),
                escape_html(&entry.route),
            );
        }
        body.push_str("</table>\n");
    }

    layout("Statistics", &body)
}

pub fn missing_page(code: &str) -> String {
    layout(
        "Not found",
        &format!(
            "<h1>Link not found</h1>\n<p>No short link exists for <code>{}</code>.</p>",
            escape_html(code)
        ),
    )
}

pub fn expired_page(link: &ShortLink) -> String {
    layout(
        "Expired",
        &format!(
            "<h1>Link expired</h1>\n<p>The short link <code>{}</code> expired at {}.</p>",
            escape_html(&link.code),
            fmt_date(link.expires_at)
        ),
    )
}
