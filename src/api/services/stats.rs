use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{Responder, web};
use tracing::trace;

use crate::api::helpers::html_response;
use crate::api::views;
use crate::services::StatsService;
use crate::store::ActionLog;

pub struct StatsPageService;

impl StatsPageService {
    /// `GET /stats`
    pub async fn stats_page(
        stats: web::Data<Arc<StatsService>>,
        log: web::Data<ActionLog>,
    ) -> impl Responder {
        let rows = stats.rows().await;
        let logs = log.get_all_logs().await;
        trace!("Rendering stats for {} links, {} log entries", rows.len(), logs.len());
        html_response(StatusCode::OK, views::stats_page(&rows, &logs))
    }
}

pub fn stats_routes() -> actix_web::Resource {
    web::resource("/stats").route(web::get().to(StatsPageService::stats_page))
}
