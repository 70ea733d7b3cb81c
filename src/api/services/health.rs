use std::sync::Arc;
use std::time::Instant;

use actix_web::{Responder, web};
use serde::Serialize;
use tracing::{info, trace};

use crate::api::helpers::success_response;
use crate::services::LinkService;

#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    /// Seconds since startup
    pub uptime: u64,
    pub links_count: usize,
    pub response_time_ms: u32,
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        links: web::Data<Arc<LinkService>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let links_count = links.store().snapshot().await.len();
        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let health = HealthResponse {
            status: "healthy".to_string(),
            timestamp: now.to_rfc3339(),
            uptime,
            links_count,
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        info!(
            "Health check completed in {:?}, {} links, uptime {}s",
            start_time.elapsed(),
            links_count,
            uptime
        );
        success_response(health)
    }
}

pub fn health_routes() -> actix_web::Resource {
    web::resource("/health")
        .route(web::get().to(HealthService::health_check))
        .route(web::head().to(HealthService::health_check))
}
