//! Link store: a links map driven by actions.
//!
//! Every change goes through [`Store::dispatch`], which runs the registered
//! middleware, then [`reduce`], then persists whatever changed. Reads are
//! served from the in-memory map loaded when the store was opened.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::storage::{ClickRecord, KvStore, ShortLink, keys};

pub mod middleware;
pub mod persist;

pub use middleware::{ActionLog, LoggingMiddleware, Middleware};

/// Code → link record
pub type LinkMap = BTreeMap<String, ShortLink>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Commit a batch of freshly created links
    CreateMany { results: Vec<ShortLink> },
    /// Append one click to a code's click list; the links map is untouched
    RedirectHit { code: String, click: ClickRecord },
    /// Drop every link whose expiry has passed
    ClearExpired,
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::CreateMany { .. } => "CREATE_MANY",
            Action::RedirectHit { .. } => "REDIRECT_HIT",
            Action::ClearExpired => "CLEAR_EXPIRED",
        }
    }

    /// Field names of the payload, for the action log
    pub fn payload_shape(&self) -> Vec<String> {
        let fields: &[&str] = match self {
            Action::CreateMany { .. } => &["results"],
            Action::RedirectHit { .. } => &["code", "click"],
            Action::ClearExpired => &[],
        };
        fields.iter().map(|f| f.to_string()).collect()
    }
}

/// Where an action was dispatched from (HTTP path or CLI command).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchContext {
    pub route: String,
}

impl DispatchContext {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
        }
    }
}

/// Pure transition of the links map. `None` means the map is unchanged.
pub fn reduce(links: &LinkMap, action: &Action, now: DateTime<Utc>) -> Option<LinkMap> {
    match action {
        Action::CreateMany { results } => {
            let mut next = links.clone();
            for link in results {
                next.insert(link.code.clone(), link.clone());
            }
            Some(next)
        }
        Action::ClearExpired => Some(
            links
                .iter()
                .filter(|(_, link)| !link.is_expired_at(now))
                .map(|(code, link)| (code.clone(), link.clone()))
                .collect(),
        ),
        Action::RedirectHit { .. } => None,
    }
}

pub struct Store {
    kv: Arc<dyn KvStore>,
    links: Mutex<LinkMap>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl Store {
    /// Load the persisted links map; an unreadable map starts empty
    pub async fn open(kv: Arc<dyn KvStore>) -> Self {
        let links = persist::load_links(kv.as_ref()).await;
        info!("Loaded {} short links", links.len());
        Self {
            kv,
            links: Mutex::new(links),
            middlewares: Vec::new(),
        }
    }

    /// Store with the action log middleware attached
    pub async fn open_with_action_log(kv: Arc<dyn KvStore>) -> Self {
        let log = ActionLog::new(kv.clone());
        Self::open(kv)
            .await
            .with_middleware(Arc::new(LoggingMiddleware::new(log)))
    }

    pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    pub async fn dispatch(&self, action: Action, ctx: &DispatchContext) -> Result<()> {
        let mut links = self.links.lock().await;

        for middleware in &self.middlewares {
            if let Err(e) = middleware.before_dispatch(&action, ctx).await {
                warn!("Middleware failed for {}: {}", action.kind(), e);
            }
        }

        if let Action::RedirectHit { code, click } = &action {
            let total = persist::append_click(self.kv.as_ref(), code, click.clone()).await?;
            debug!("Recorded click #{} for '{}'", total, code);
            return Ok(());
        }

        if let Some(next) = reduce(&links, &action, Utc::now()) {
            let dropped: Vec<String> = links
                .keys()
                .filter(|code| !next.contains_key(*code))
                .cloned()
                .collect();
            if !dropped.is_empty() {
                debug!("Retiring {} codes", dropped.len());
                persist::retire_codes(self.kv.as_ref(), dropped).await?;
            }
            persist::save_links(self.kv.as_ref(), &next).await?;
            debug!(
                "{} applied: {} -> {} links",
                action.kind(),
                links.len(),
                next.len()
            );
            *links = next;
        }

        Ok(())
    }

    pub async fn get_link(&self, code: &str) -> Option<ShortLink> {
        self.links.lock().await.get(code).cloned()
    }

    /// Newest first
    pub async fn get_all_links(&self) -> Vec<ShortLink> {
        let mut links: Vec<ShortLink> = self.links.lock().await.values().cloned().collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        links
    }

    /// Every code ever handed out: live links, swept links and any code
    /// that still owns a click list.
    pub async fn issued_codes(&self) -> Result<HashSet<String>> {
        let mut codes: HashSet<String> = self.links.lock().await.keys().cloned().collect();
        codes.extend(persist::load_retired(self.kv.as_ref()).await);
        codes.extend(
            self.kv
                .keys()
                .await?
                .iter()
                .filter_map(|key| keys::code_of_clicks_key(key))
                .map(str::to_string),
        );
        Ok(codes)
    }

    pub async fn snapshot(&self) -> LinkMap {
        self.links.lock().await.clone()
    }

    pub async fn get_clicks(&self, code: &str) -> Vec<ClickRecord> {
        persist::load_clicks(self.kv.as_ref(), code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;
    use chrono::Duration;

    fn link(code: &str, created_at: DateTime<Utc>, expires_at: Option<DateTime<Utc>>) -> ShortLink {
        ShortLink {
            code: code.to_string(),
            url: format!("https://{}.example.com", code),
            created_at,
            expires_at,
            validity_mins: 30,
        }
    }

    #[test]
    fn test_reduce_create_many_merges() {
        let now = Utc::now();
        let mut links = LinkMap::new();
        links.insert("old1".to_string(), link("old1", now, None));

        let next = reduce(
            &links,
            &Action::CreateMany {
                results: vec![link("new1", now, None), link("new2", now, None)],
            },
            now,
        )
        .unwrap();
        assert_eq!(next.len(), 3);
        assert!(next.contains_key("old1"));
        // input untouched
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_reduce_clear_expired_keeps_live_and_unbounded() {
        let now = Utc::now();
        let mut links = LinkMap::new();
        links.insert("live".to_string(), link("live", now, Some(now + Duration::minutes(5))));
        links.insert("gone".to_string(), link("gone", now, Some(now - Duration::minutes(5))));
        links.insert("edge".to_string(), link("edge", now, Some(now)));
        links.insert("free".to_string(), link("free", now, None));

        let next = reduce(&links, &Action::ClearExpired, now).unwrap();
        let mut codes: Vec<_> = next.keys().cloned().collect();
        codes.sort();
        assert_eq!(codes, vec!["free".to_string(), "live".to_string()]);
    }

    #[test]
    fn test_reduce_redirect_hit_is_noop() {
        let now = Utc::now();
        let action = Action::RedirectHit {
            code: "abcd".to_string(),
            click: ClickRecord {
                timestamp: now,
                source: "Direct".to_string(),
                location: "UTC • en".to_string(),
            },
        };
        assert!(reduce(&LinkMap::new(), &action, now).is_none());
    }

    #[tokio::test]
    async fn test_dispatch_persists_and_reopens() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let store = Store::open_with_action_log(kv.clone()).await;
        let now = Utc::now();

        store
            .dispatch(
                Action::CreateMany {
                    results: vec![link("abcd", now, None)],
                },
                &DispatchContext::new("/"),
            )
            .await
            .unwrap();

        assert!(kv.get_item(keys::LINKS).await.unwrap().is_some());
        let reopened = Store::open(kv.clone()).await;
        assert_eq!(reopened.get_link("abcd").await.unwrap().url, "https://abcd.example.com");

        let logs = ActionLog::new(kv).get_all_logs().await;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].route, "/");
    }

    #[tokio::test]
    async fn test_swept_codes_stay_issued() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let store = Store::open(kv.clone()).await;
        let now = Utc::now();
        store
            .dispatch(
                Action::CreateMany {
                    results: vec![
                        link("gone", now, Some(now - Duration::minutes(1))),
                        link("live", now, None),
                    ],
                },
                &DispatchContext::default(),
            )
            .await
            .unwrap();
        persist::append_click(
            kv.as_ref(),
            "orphan",
            ClickRecord {
                timestamp: now,
                source: "Direct".to_string(),
                location: "UTC • en".to_string(),
            },
        )
        .await
        .unwrap();

        store
            .dispatch(Action::ClearExpired, &DispatchContext::default())
            .await
            .unwrap();
        assert!(store.get_link("gone").await.is_none());
        assert!(persist::load_retired(kv.as_ref()).await.contains("gone"));

        let issued = Store::open(kv).await.issued_codes().await.unwrap();
        for code in ["gone", "live", "orphan"] {
            assert!(issued.contains(code), "{} should be issued", code);
        }
    }

    #[tokio::test]
    async fn test_get_all_links_newest_first() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let store = Store::open(kv).await;
        let now = Utc::now();
        store
            .dispatch(
                Action::CreateMany {
                    results: vec![
                        link("aaaa", now - Duration::minutes(2), None),
                        link("bbbb", now, None),
                        link("cccc", now - Duration::minutes(1), None),
                    ],
                },
                &DispatchContext::default(),
            )
            .await
            .unwrap();

        let codes: Vec<String> = store.get_all_links().await.into_iter().map(|l| l.code).collect();
        assert_eq!(codes, vec!["bbbb", "cccc", "aaaa"]);
    }
}
