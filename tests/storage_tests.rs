//! Storage tests
//!
//! File backend persistence through the full context, and recovery from
//! damaged data.

use std::sync::Arc;

use tempfile::TempDir;

use linkstash::config::Config;
use linkstash::errors::LinkStashError;
use linkstash::runtime::AppContext;
use linkstash::services::{CreateLinkItem, VisitContext};
use linkstash::storage::{FileKvStore, KvStore, MemoryKvStore, StorageFactory, keys};
use linkstash::store::{DispatchContext, persist};

fn file_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.backend = "file".to_string();
    config.storage.data_file = dir
        .path()
        .join("data/linkstash.json")
        .to_string_lossy()
        .into_owned();
    config.redirect.delay_ms = 0;
    config
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);

    {
        let ctx = AppContext::prepare(&config).await.unwrap();
        ctx.link_service
            .create_many(
                vec![CreateLinkItem::new("https://persist.io").with_code("keep01")],
                &DispatchContext::new("/"),
            )
            .await
            .unwrap();
        ctx.redirector
            .resolve("keep01", &VisitContext::default(), &DispatchContext::new("/keep01"))
            .await;
    }

    let ctx = AppContext::prepare(&config).await.unwrap();
    let link = ctx.link_service.get_link("keep01").await.unwrap();
    assert_eq!(link.url, "https://persist.io");
    assert_eq!(ctx.link_service.get_clicks("keep01").await.len(), 1);
    assert_eq!(ctx.action_log.get_all_logs().await.len(), 2);
}

#[tokio::test]
async fn test_data_file_layout() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    let ctx = AppContext::prepare(&config).await.unwrap();
    ctx.link_service
        .create_many(
            vec![CreateLinkItem::new("https://layout.io").with_code("lay001")],
            &DispatchContext::new("/"),
        )
        .await
        .unwrap();
    ctx.redirector
        .resolve("lay001", &VisitContext::default(), &DispatchContext::new("/lay001"))
        .await;

    let raw = std::fs::read_to_string(&config.storage.data_file).unwrap();
    let outer: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let links: serde_json::Value =
        serde_json::from_str(outer["linkstash_links_v1"].as_str().unwrap()).unwrap();
    assert_eq!(links["lay001"]["url"], "https://layout.io");
    assert_eq!(links["lay001"]["validityMins"], 30);
    assert!(links["lay001"]["createdAt"].is_string());

    let clicks: serde_json::Value =
        serde_json::from_str(outer["linkstash_clicks_lay001_v1"].as_str().unwrap()).unwrap();
    assert_eq!(clicks.as_array().unwrap().len(), 1);

    let logs: serde_json::Value =
        serde_json::from_str(outer["linkstash_logs_v1"].as_str().unwrap()).unwrap();
    assert_eq!(logs.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_corrupt_values_fall_back_to_empty() {
    let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    kv.set_item(keys::LINKS, "{not json".to_string()).await.unwrap();
    kv.set_item(keys::LOGS, "42".to_string()).await.unwrap();
    kv.set_item(&keys::clicks("abcd"), "oops".to_string()).await.unwrap();

    let ctx = AppContext::with_kv(&Config::default(), kv.clone()).await;

    assert!(ctx.link_service.get_all_links().await.is_empty());
    assert!(ctx.action_log.get_all_logs().await.is_empty());
    assert!(ctx.link_service.get_clicks("abcd").await.is_empty());

    // The next write replaces the damaged value
    ctx.link_service
        .create_many(vec![CreateLinkItem::new("https://a.io")], &DispatchContext::new("/"))
        .await
        .unwrap();
    assert_eq!(persist::load_links(kv.as_ref()).await.len(), 1);
}

#[tokio::test]
async fn test_corrupt_data_file_fails_writes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "[this is not an object").unwrap();

    let kv: Arc<dyn KvStore> = Arc::new(FileKvStore::open(&path).unwrap());
    assert!(matches!(
        kv.get_item(keys::LINKS).await,
        Err(LinkStashError::Serialization(_))
    ));

    let ctx = AppContext::with_kv(&Config::default(), kv).await;
    assert!(ctx.link_service.get_all_links().await.is_empty());

    let err = ctx
        .link_service
        .create_many(vec![CreateLinkItem::new("https://a.io")], &DispatchContext::new("/"))
        .await
        .unwrap_err();
    assert!(matches!(err, LinkStashError::Serialization(_)));
    // The damaged file is left untouched for inspection
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[this is not an object");
}

#[tokio::test]
async fn test_kv_store_operations() {
    let dir = TempDir::new().unwrap();
    let file: Arc<dyn KvStore> = Arc::new(FileKvStore::open(dir.path().join("kv.json")).unwrap());
    let memory: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());

    for kv in [file, memory] {
        kv.set_item("a", "1".to_string()).await.unwrap();
        kv.set_item("b", "2".to_string()).await.unwrap();
        kv.set_item("a", "3".to_string()).await.unwrap();
        assert_eq!(kv.get_item("a").await.unwrap().as_deref(), Some("3"));

        let mut keys = kv.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
        assert!(kv.get_item("missing").await.unwrap().is_none());
    }
}

#[test]
fn test_factory_backends() {
    let dir = TempDir::new().unwrap();
    let mut config = file_config(&dir).storage;
    assert_eq!(StorageFactory::create(&config).unwrap().backend_name(), "file");
    assert!(std::path::Path::new(&config.data_file).exists());

    config.backend = "memory".to_string();
    assert_eq!(StorageFactory::create(&config).unwrap().backend_name(), "memory");
}
