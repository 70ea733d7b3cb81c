use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::LinkService;
use crate::storage::ClickRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkStatus {
    Active,
    Expired,
}

impl LinkStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LinkStatus::Active => "Active",
            LinkStatus::Expired => "Expired",
        }
    }
}

/// One row of the statistics listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStatsRow {
    pub code: String,
    pub url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: LinkStatus,
    pub total_clicks: usize,
    pub clicks: Vec<ClickRecord>,
}

pub struct StatsService {
    links: Arc<LinkService>,
}

impl StatsService {
    pub fn new(links: Arc<LinkService>) -> Self {
        Self { links }
    }

    /// Every link, newest first, with its click list
    pub async fn rows(&self) -> Vec<LinkStatsRow> {
        let now = Utc::now();
        let public_host = &self.links.config().public_host;
        let mut rows = Vec::new();

        for link in self.links.get_all_links().await {
            let clicks = self.links.get_clicks(&link.code).await;
            rows.push(LinkStatsRow {
                short_url: link.short_url(public_host),
                status: if link.is_expired_at(now) {
                    LinkStatus::Expired
                } else {
                    LinkStatus::Active
                },
                total_clicks: clicks.len(),
                clicks,
                created_at: link.created_at,
                expires_at: link.expires_at,
                code: link.code,
                url: link.url,
            });
        }

        rows
    }
}
