//! JSON blobs on top of a [`KvStore`].
//!
//! Reads never fail: a missing key, an unreadable store or a value that does
//! not parse all come back as the empty value.

use std::collections::BTreeSet;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::LinkMap;
use crate::errors::Result;
use crate::storage::{ClickRecord, KvStore, keys};

pub async fn load_json<T>(kv: &dyn KvStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match kv.get_item(key).await {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Discarding unparsable value under '{}': {}", key, e);
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            warn!("Failed to read '{}', using empty value: {}", key, e);
            T::default()
        }
    }
}

pub async fn save_json<T>(kv: &dyn KvStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    kv.set_item(key, raw).await
}

pub async fn load_links(kv: &dyn KvStore) -> LinkMap {
    load_json(kv, keys::LINKS).await
}

pub async fn save_links(kv: &dyn KvStore, links: &LinkMap) -> Result<()> {
    save_json(kv, keys::LINKS, links).await
}

pub async fn load_retired(kv: &dyn KvStore) -> BTreeSet<String> {
    load_json(kv, keys::RETIRED).await
}

/// Adds `codes` to the retired set
pub async fn retire_codes<I>(kv: &dyn KvStore, codes: I) -> Result<()>
where
    I: IntoIterator<Item = String>,
{
    let mut retired = load_retired(kv).await;
    retired.extend(codes);
    save_json(kv, keys::RETIRED, &retired).await
}

pub async fn load_clicks(kv: &dyn KvStore, code: &str) -> Vec<ClickRecord> {
    load_json(kv, &keys::clicks(code)).await
}

pub async fn save_clicks(kv: &dyn KvStore, code: &str, clicks: &[ClickRecord]) -> Result<()> {
    save_json(kv, &keys::clicks(code), clicks).await
}

/// Read-modify-write of one code's click list
pub async fn append_click(kv: &dyn KvStore, code: &str, click: ClickRecord) -> Result<usize> {
    let mut clicks = load_clicks(kv, code).await;
    clicks.push(click);
    save_clicks(kv, code, &clicks).await?;
    Ok(clicks.len())
}
