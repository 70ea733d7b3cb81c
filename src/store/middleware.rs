//! Dispatch middleware and the persisted action log.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::{Action, DispatchContext, persist};
use crate::errors::Result;
use crate::storage::{KvStore, LogEntry, LogMeta, keys};

pub const APP_TAG: &str = "LINKSTASH";

/// Runs before the reducer sees an action. Returning `Err` does not stop the
/// dispatch; the store logs it and moves on.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn before_dispatch(&self, action: &Action, ctx: &DispatchContext) -> Result<()>;
}

/// Append-only list of action summaries under the logs key.
#[derive(Clone)]
pub struct ActionLog {
    kv: Arc<dyn KvStore>,
}

impl ActionLog {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub async fn append(&self, entry: LogEntry) -> Result<()> {
        let mut logs = self.get_all_logs().await;
        logs.push(entry);
        persist::save_json(self.kv.as_ref(), keys::LOGS, &logs).await
    }

    /// Oldest first
    pub async fn get_all_logs(&self) -> Vec<LogEntry> {
        persist::load_json(self.kv.as_ref(), keys::LOGS).await
    }

    pub async fn clear_logs(&self) -> Result<()> {
        persist::save_json(self.kv.as_ref(), keys::LOGS, &Vec::<LogEntry>::new()).await
    }
}

/// Records one [`LogEntry`] per dispatched action.
pub struct LoggingMiddleware {
    log: ActionLog,
    app: String,
}

impl LoggingMiddleware {
    pub fn new(log: ActionLog) -> Self {
        Self {
            log,
            app: APP_TAG.to_string(),
        }
    }
}

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn before_dispatch(&self, action: &Action, ctx: &DispatchContext) -> Result<()> {
        let entry = LogEntry {
            ts: Utc::now(),
            action_type: action.kind().to_string(),
            payload_shape: action.payload_shape(),
            route: ctx.route.clone(),
            meta: LogMeta {
                app: self.app.clone(),
            },
        };
        debug!(action = %entry.action_type, route = %entry.route, "Recording action");
        self.log.append(entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;

    #[tokio::test]
    async fn test_logging_middleware_records_shape_and_route() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let log = ActionLog::new(kv);
        let middleware = LoggingMiddleware::new(log.clone());

        middleware
            .before_dispatch(&Action::ClearExpired, &DispatchContext::new("cli:sweep"))
            .await
            .unwrap();
        middleware
            .before_dispatch(
                &Action::CreateMany { results: vec![] },
                &DispatchContext::new("/"),
            )
            .await
            .unwrap();

        let logs = log.get_all_logs().await;
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].action_type, "CLEAR_EXPIRED");
        assert!(logs[0].payload_shape.is_empty());
        assert_eq!(logs[0].route, "cli:sweep");
        assert_eq!(logs[1].action_type, "CREATE_MANY");
        assert_eq!(logs[1].payload_shape, vec!["results".to_string()]);
        assert_eq!(logs[1].meta.app, APP_TAG);
    }

    #[tokio::test]
    async fn test_clear_logs() {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let log = ActionLog::new(kv.clone());
        let middleware = LoggingMiddleware::new(log.clone());
        middleware
            .before_dispatch(&Action::ClearExpired, &DispatchContext::default())
            .await
            .unwrap();

        log.clear_logs().await.unwrap();
        assert!(log.get_all_logs().await.is_empty());
        assert_eq!(kv.get_item(keys::LOGS).await.unwrap().as_deref(), Some("[]"));
    }
}
