//! Redirect resolution tests, at the service level and over HTTP.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::App;
use chrono::{Duration, Utc};

use linkstash::api::services::AppStartTime;
use linkstash::config::Config;
use linkstash::runtime::AppContext;
use linkstash::runtime::modes::app_config;
use linkstash::services::{CreateLinkItem, DIRECT_SOURCE, RedirectOutcome, VisitContext};
use linkstash::storage::{KvStore, MemoryKvStore, ShortLink};
use linkstash::store::{DispatchContext, LinkMap, persist};

// =============================================================================
// Test Setup
// =============================================================================

fn test_config() -> Config {
    let mut config = Config::default();
    config.redirect.delay_ms = 0;
    config.location.timezone = Some("Europe/Berlin".to_string());
    config
}

/// Context seeded with one live link `live01` and one expired link `dead01`
async fn seeded_context() -> AppContext {
    let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    let now = Utc::now();
    let mut links = LinkMap::new();
    links.insert(
        "live01".to_string(),
        ShortLink {
            code: "live01".to_string(),
            url: "https://example.com/live".to_string(),
            created_at: now,
            expires_at: Some(now + Duration::minutes(30)),
            validity_mins: 30,
        },
    );
    links.insert(
        "dead01".to_string(),
        ShortLink {
            code: "dead01".to_string(),
            url: "https://example.com/dead".to_string(),
            created_at: now - Duration::minutes(31),
            expires_at: Some(now - Duration::minutes(1)),
            validity_mins: 30,
        },
    );
    persist::save_links(kv.as_ref(), &links).await.unwrap();
    AppContext::with_kv(&test_config(), kv).await
}

fn route(code: &str) -> DispatchContext {
    DispatchContext::new(format!("/{}", code))
}

// =============================================================================
// Redirector
// =============================================================================

#[tokio::test]
async fn test_resolve_missing_records_nothing() {
    let ctx = seeded_context().await;
    let outcome = ctx
        .redirector
        .resolve("nope99", &VisitContext::default(), &route("nope99"))
        .await;

    assert_eq!(outcome, RedirectOutcome::Missing);
    assert_eq!(outcome.status(), "missing");
    assert!(ctx.link_service.get_clicks("nope99").await.is_empty());
    assert!(ctx.action_log.get_all_logs().await.is_empty());
}

#[tokio::test]
async fn test_resolve_expired_records_nothing() {
    let ctx = seeded_context().await;
    let outcome = ctx
        .redirector
        .resolve("dead01", &VisitContext::default(), &route("dead01"))
        .await;

    match outcome {
        RedirectOutcome::Expired(link) => assert_eq!(link.code, "dead01"),
        other => panic!("expected Expired, got {:?}", other),
    }
    assert!(ctx.link_service.get_clicks("dead01").await.is_empty());
}

#[tokio::test]
async fn test_resolve_ok_appends_exactly_one_click() {
    let ctx = seeded_context().await;
    let visit = VisitContext {
        referrer: None,
        accept_language: Some("de-DE,de;q=0.9,en;q=0.8".to_string()),
    };

    let outcome = ctx.redirector.resolve("live01", &visit, &route("live01")).await;

    let RedirectOutcome::Ok { link, click } = outcome else {
        panic!("expected Ok");
    };
    assert_eq!(link.url, "https://example.com/live");
    assert_eq!(click.source, DIRECT_SOURCE);
    assert_eq!(click.location, "Europe/Berlin • de-DE");

    let clicks = ctx.link_service.get_clicks("live01").await;
    assert_eq!(clicks, vec![click]);

    let logs = ctx.action_log.get_all_logs().await;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action_type, "REDIRECT_HIT");
    assert_eq!(logs[0].route, "/live01");
    assert_eq!(logs[0].payload_shape, vec!["code".to_string(), "click".to_string()]);
}

#[tokio::test]
async fn test_resolve_records_referrer_and_accumulates() {
    let ctx = seeded_context().await;
    let visit = VisitContext {
        referrer: Some("https://news.example.org/post".to_string()),
        accept_language: None,
    };

    ctx.redirector.resolve("live01", &visit, &route("live01")).await;
    ctx.redirector
        .resolve("live01", &VisitContext::default(), &route("live01"))
        .await;

    let clicks = ctx.link_service.get_clicks("live01").await;
    assert_eq!(clicks.len(), 2);
    assert_eq!(clicks[0].source, "https://news.example.org/post");
    assert_eq!(clicks[1].source, DIRECT_SOURCE);
    assert_eq!(clicks[1].location, "Europe/Berlin • en");
    assert!(clicks[0].timestamp <= clicks[1].timestamp);
}

#[tokio::test]
async fn test_fresh_link_resolves_immediately() {
    let kv: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
    let ctx = AppContext::with_kv(&test_config(), kv).await;
    let created = ctx
        .link_service
        .create_many(
            vec![CreateLinkItem::new("https://target.io").with_validity(1)],
            &DispatchContext::new("/"),
        )
        .await
        .unwrap();
    let code = &created.results[0].code;

    let outcome = ctx
        .redirector
        .resolve(code, &VisitContext::default(), &route(code))
        .await;
    assert_eq!(outcome.status(), "ok");
}

// =============================================================================
// HTTP
// =============================================================================

macro_rules! app {
    ($ctx:expr) => {{
        let start = AppStartTime {
            start_datetime: Utc::now(),
        };
        let ctx = $ctx.clone();
        test::init_service(App::new().configure(move |cfg| app_config(&ctx, &start, cfg))).await
    }};
}

#[actix_rt::test]
async fn test_http_redirect_ok() {
    let ctx = seeded_context().await;
    let app = app!(ctx);

    let req = TestRequest::get()
        .uri("/live01")
        .insert_header(("Referer", "https://blog.example.net/"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        resp.headers().get("Location").unwrap(),
        "https://example.com/live"
    );

    let clicks = ctx.link_service.get_clicks("live01").await;
    assert_eq!(clicks.len(), 1);
    assert_eq!(clicks[0].source, "https://blog.example.net/");
}

#[actix_rt::test]
async fn test_http_redirect_missing_is_404() {
    let ctx = seeded_context().await;
    let app = app!(ctx);

    let resp = test::call_service(&app, TestRequest::get().uri("/nope99").to_request()).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("Link not found"));
    assert!(ctx.link_service.get_clicks("nope99").await.is_empty());
}

#[actix_rt::test]
async fn test_http_redirect_expired_is_410() {
    let ctx = seeded_context().await;
    let app = app!(ctx);

    let resp = test::call_service(&app, TestRequest::get().uri("/dead01").to_request()).await;

    assert_eq!(resp.status(), StatusCode::GONE);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("Link expired"));
    assert!(ctx.link_service.get_clicks("dead01").await.is_empty());
}

#[actix_rt::test]
async fn test_http_redirect_waits_for_delay() {
    let mut config = test_config();
    config.redirect.delay_ms = 150;
    let ctx = AppContext::with_kv(&config, Arc::new(MemoryKvStore::new())).await;
    let created = ctx
        .link_service
        .create_many(vec![CreateLinkItem::new("https://slow.io")], &DispatchContext::new("/"))
        .await
        .unwrap();
    let uri = format!("/{}", created.results[0].code);
    let app = app!(ctx);

    let started = std::time::Instant::now();
    let resp = test::call_service(&app, TestRequest::get().uri(&uri).to_request()).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(started.elapsed() >= std::time::Duration::from_millis(150));
}
