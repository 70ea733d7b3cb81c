use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, instrument};

use super::LinkService;
use crate::storage::{ClickRecord, ShortLink};
use crate::store::DispatchContext;
use crate::utils::coarse_location;

pub const DIRECT_SOURCE: &str = "Direct";

/// What the visitor's request tells us about the visit.
#[derive(Debug, Clone, Default)]
pub struct VisitContext {
    pub referrer: Option<String>,
    pub accept_language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// No link under this code
    Missing,
    /// The link exists but its validity window has closed
    Expired(ShortLink),
    /// A click was recorded; navigate to `link.url`
    Ok { link: ShortLink, click: ClickRecord },
}

impl RedirectOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            RedirectOutcome::Missing => "missing",
            RedirectOutcome::Expired(_) => "expired",
            RedirectOutcome::Ok { .. } => "ok",
        }
    }
}

pub struct Redirector {
    links: Arc<LinkService>,
    timezone: Option<String>,
    delay: Duration,
}

impl Redirector {
    pub fn new(links: Arc<LinkService>, timezone: Option<String>, delay: Duration) -> Self {
        Self {
            links,
            timezone,
            delay,
        }
    }

    /// Pause before navigating away on a successful resolution
    pub fn delay(&self) -> Duration {
        self.delay
    }

    #[instrument(skip(self, visit, ctx))]
    pub async fn resolve(
        &self,
        code: &str,
        visit: &VisitContext,
        ctx: &DispatchContext,
    ) -> RedirectOutcome {
        let Some(link) = self.links.get_link(code).await else {
            debug!("Redirect link not found: {}", code);
            return RedirectOutcome::Missing;
        };

        let now = Utc::now();
        if link.is_expired_at(now) {
            debug!("Redirect link expired: {}", code);
            return RedirectOutcome::Expired(link);
        }

        let click = ClickRecord {
            timestamp: now,
            source: visit
                .referrer
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .unwrap_or(DIRECT_SOURCE)
                .to_string(),
            location: coarse_location(self.timezone.as_deref(), visit.accept_language.as_deref()),
        };

        if let Err(e) = self.links.add_click(code, click.clone(), ctx).await {
            error!("Failed to record click for '{}': {}", code, e);
        }

        RedirectOutcome::Ok { link, click }
    }
}
