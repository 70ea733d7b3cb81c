use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::Config;
use crate::errors::Result;
use crate::services::{CodeGenerator, LinkService, RandomCodeGenerator, Redirector, StatsService};
use crate::storage::{KvStore, StorageFactory};
use crate::store::{ActionLog, Store};

/// Everything the HTTP handlers and CLI commands need, wired over one
/// key-value store.
#[derive(Clone)]
pub struct AppContext {
    pub kv: Arc<dyn KvStore>,
    pub link_service: Arc<LinkService>,
    pub redirector: Arc<Redirector>,
    pub stats: Arc<StatsService>,
    pub action_log: ActionLog,
}

impl AppContext {
    /// Opens the configured storage backend and loads the link store
    pub async fn prepare(config: &Config) -> Result<Self> {
        let start_time = std::time::Instant::now();
        debug!("Starting pre-startup processing...");

        let kv = StorageFactory::create(&config.storage)?;
        let ctx = Self::with_kv(config, kv).await;
        info!(
            "Startup ready in {:?}: {} links loaded",
            start_time.elapsed(),
            ctx.link_service.store().snapshot().await.len()
        );
        Ok(ctx)
    }

    pub async fn with_kv(config: &Config, kv: Arc<dyn KvStore>) -> Self {
        Self::with_generator(config, kv, Arc::new(RandomCodeGenerator)).await
    }

    pub async fn with_generator(
        config: &Config,
        kv: Arc<dyn KvStore>,
        generator: Arc<dyn CodeGenerator>,
    ) -> Self {
        let store = Arc::new(Store::open_with_action_log(kv.clone()).await);
        let link_service = Arc::new(LinkService::with_generator(
            store,
            config.links.clone(),
            generator,
        ));
        let redirector = Arc::new(Redirector::new(
            link_service.clone(),
            config.location.timezone.clone(),
            Duration::from_millis(config.redirect.delay_ms),
        ));
        let stats = Arc::new(StatsService::new(link_service.clone()));

        Self {
            action_log: ActionLog::new(kv.clone()),
            kv,
            link_service,
            redirector,
            stats,
        }
    }
}
