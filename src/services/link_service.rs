//! Link management service
//!
//! Batch creation, lookups and the expiry sweep, shared by the HTTP
//! handlers and the CLI.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::config::LinkConfig;
use crate::errors::Result;
use crate::storage::{ClickRecord, ShortLink};
use crate::store::{Action, DispatchContext, Store};
use crate::utils::{
    generate_random_code, is_valid_short_code, is_valid_url, minutes_from_now, parse_valid_int,
};

pub const NO_ITEMS: &str = "No items provided";
pub const INVALID_URL: &str = "Invalid URL";
pub const INVALID_VALIDITY: &str = "Validity must be a positive integer (minutes)";
pub const INVALID_CUSTOM_CODE: &str = "Custom shortcode must be 4-32 chars, alphanumeric only";
pub const GENERATION_EXHAUSTED: &str = "Failed to generate unique shortcode; try again";

/// Paths served by the HTTP layer; never handed out as codes
pub const RESERVED_CODES: &[&str] = &["stats", "health"];

fn duplicate_code(code: &str) -> String {
    format!("Shortcode \"{}\" already exists", code)
}

// ============ Code generation ============

pub trait CodeGenerator: Send + Sync {
    fn generate(&self, length: usize) -> String;
}

/// Uniform random codes over `[A-Za-z0-9]`
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, length: usize) -> String {
        generate_random_code(length)
    }
}

// ============ Request/Response DTOs ============

/// One row of a batch submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkItem {
    pub url: String,
    /// Raw user input; blank or absent uses the configured default
    #[serde(default, alias = "validity_mins", deserialize_with = "deserialize_raw_minutes")]
    pub validity_mins: Option<String>,
    #[serde(default, alias = "custom_code")]
    pub custom_code: Option<String>,
}

impl CreateLinkItem {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_validity(mut self, mins: impl ToString) -> Self {
        self.validity_mins = Some(mins.to_string());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.custom_code = Some(code.into());
        self
    }
}

/// Accepts a JSON number, a string or null for the validity field
fn deserialize_raw_minutes<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// A failed batch row. `index` is absent for errors about the whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub message: String,
}

impl BatchError {
    fn at(index: usize, message: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            message: message.into(),
        }
    }

    fn batch(message: impl Into<String>) -> Self {
        Self {
            index: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchCreateResult {
    pub results: Vec<ShortLink>,
    pub errors: Vec<BatchError>,
}

// ============ LinkService Implementation ============

pub struct LinkService {
    store: Arc<Store>,
    config: LinkConfig,
    generator: Arc<dyn CodeGenerator>,
    /// Serializes the check-then-commit of batch creation and sweeps
    write_lock: Mutex<()>,
}

impl LinkService {
    pub fn new(store: Arc<Store>, config: LinkConfig) -> Self {
        Self::with_generator(store, config, Arc::new(RandomCodeGenerator))
    }

    pub fn with_generator(
        store: Arc<Store>,
        config: LinkConfig,
        generator: Arc<dyn CodeGenerator>,
    ) -> Self {
        Self {
            store,
            config: config.clamped(),
            generator,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Create up to `max_batch` links. Rows fail independently; the
    /// successful ones are committed together in a single dispatch.
    #[instrument(skip_all, fields(route = %ctx.route, items = items.len()))]
    pub async fn create_many(
        &self,
        items: Vec<CreateLinkItem>,
        ctx: &DispatchContext,
    ) -> Result<BatchCreateResult> {
        let mut result = BatchCreateResult::default();

        if items.is_empty() {
            result.errors.push(BatchError::batch(NO_ITEMS));
            return Ok(result);
        }

        if items.len() > self.config.max_batch {
            debug!(
                "Batch of {} truncated to the first {}",
                items.len(),
                self.config.max_batch
            );
        }

        let _guard = self.write_lock.lock().await;

        let mut all_codes: HashSet<String> = self.store.issued_codes().await?;
        all_codes.extend(RESERVED_CODES.iter().map(|c| c.to_string()));
        let now = Utc::now();

        for (index, item) in items.into_iter().take(self.config.max_batch).enumerate() {
            match self.prepare_link(item, &all_codes, now) {
                Ok(link) => {
                    all_codes.insert(link.code.clone());
                    result.results.push(link);
                }
                Err(message) => {
                    debug!("Row {} rejected: {}", index, message);
                    result.errors.push(BatchError::at(index, message));
                }
            }
        }

        self.store
            .dispatch(
                Action::CreateMany {
                    results: result.results.clone(),
                },
                ctx,
            )
            .await?;

        info!(
            "LinkService: created {} links, {} errors",
            result.results.len(),
            result.errors.len()
        );
        Ok(result)
    }

    fn prepare_link(
        &self,
        item: CreateLinkItem,
        taken: &HashSet<String>,
        now: DateTime<Utc>,
    ) -> std::result::Result<ShortLink, String> {
        let url = item.url.trim().to_string();
        if !is_valid_url(&url) {
            return Err(INVALID_URL.to_string());
        }

        let validity_mins = self.parse_validity(item.validity_mins.as_deref())?;

        let code = match item.custom_code.as_deref().filter(|c| !c.is_empty()) {
            Some(raw) => {
                let custom = raw.trim();
                if !is_valid_short_code(custom) {
                    return Err(INVALID_CUSTOM_CODE.to_string());
                }
                if taken.contains(custom) {
                    return Err(duplicate_code(custom));
                }
                custom.to_string()
            }
            None => self.generate_unique_code(taken)?,
        };

        Ok(ShortLink {
            code,
            url,
            created_at: now,
            expires_at: Some(minutes_from_now(now, validity_mins)),
            validity_mins,
        })
    }

    fn parse_validity(&self, raw: Option<&str>) -> std::result::Result<u32, String> {
        match raw.and_then(parse_valid_int) {
            None => Ok(self.config.default_validity_mins),
            Some(Ok(mins)) if mins > 0 => {
                u32::try_from(mins).map_err(|_| INVALID_VALIDITY.to_string())
            }
            Some(_) => Err(INVALID_VALIDITY.to_string()),
        }
    }

    fn generate_unique_code(&self, taken: &HashSet<String>) -> std::result::Result<String, String> {
        let attempts = self.config.max_generate_attempts.max(1);
        for attempt in 1..=attempts {
            let code = self.generator.generate(self.config.code_length);
            if !taken.contains(&code) {
                return Ok(code);
            }
            debug!("Generated code collided (attempt {}/{})", attempt, attempts);
        }
        Err(GENERATION_EXHAUSTED.to_string())
    }

    pub async fn get_link(&self, code: &str) -> Option<ShortLink> {
        self.store.get_link(code).await
    }

    /// Newest first
    pub async fn get_all_links(&self) -> Vec<ShortLink> {
        self.store.get_all_links().await
    }

    pub async fn get_clicks(&self, code: &str) -> Vec<ClickRecord> {
        self.store.get_clicks(code).await
    }

    pub async fn add_click(
        &self,
        code: &str,
        click: ClickRecord,
        ctx: &DispatchContext,
    ) -> Result<()> {
        self.store
            .dispatch(
                Action::RedirectHit {
                    code: code.to_string(),
                    click,
                },
                ctx,
            )
            .await
    }

    /// Remove every expired link. Returns how many were dropped.
    pub async fn clear_expired(&self, ctx: &DispatchContext) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let before = self.store.snapshot().await.len();
        self.store.dispatch(Action::ClearExpired, ctx).await?;
        let removed = before.saturating_sub(self.store.snapshot().await.len());

        info!("LinkService: swept {} expired links", removed);
        Ok(removed)
    }
}
