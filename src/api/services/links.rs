//! JSON API over links, clicks and the action log

use std::sync::Arc;

use actix_web::{HttpRequest, Responder, web};
use serde::Serialize;
use tracing::{error, info};

use crate::api::helpers::{api_result, error_from_linkstash, success_response};
use crate::errors::LinkStashError;
use crate::services::{CreateLinkItem, LinkService};
use crate::storage::ClickRecord;
use crate::store::{ActionLog, DispatchContext};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClicksResponse {
    pub code: String,
    pub total_clicks: usize,
    pub clicks: Vec<ClickRecord>,
}

pub struct LinksService;

impl LinksService {
    /// `POST /api/links` with a JSON array of items
    pub async fn create_links(
        req: HttpRequest,
        items: web::Json<Vec<CreateLinkItem>>,
        links: web::Data<Arc<LinkService>>,
    ) -> impl Responder {
        let ctx = DispatchContext::new(req.path());
        let items = items.into_inner();
        info!("API: batch create request with {} items", items.len());
        api_result(links.create_many(items, &ctx).await)
    }

    /// `GET /api/links`, newest first
    pub async fn get_all_links(links: web::Data<Arc<LinkService>>) -> impl Responder {
        success_response(links.get_all_links().await)
    }

    /// `GET /api/links/{code}/clicks`
    pub async fn get_clicks(
        path: web::Path<String>,
        links: web::Data<Arc<LinkService>>,
    ) -> impl Responder {
        let code = path.into_inner();
        if links.get_link(&code).await.is_none() {
            return error_from_linkstash(&LinkStashError::not_found(format!(
                "Link not found: {}",
                code
            )));
        }
        let clicks = links.get_clicks(&code).await;
        success_response(ClicksResponse {
            total_clicks: clicks.len(),
            clicks,
            code,
        })
    }

    /// `GET /api/logs`, oldest first
    pub async fn get_logs(log: web::Data<ActionLog>) -> impl Responder {
        success_response(log.get_all_logs().await)
    }

    /// `DELETE /api/logs`
    pub async fn clear_logs(log: web::Data<ActionLog>) -> impl Responder {
        match log.clear_logs().await {
            Ok(()) => {
                info!("API: action log cleared");
                success_response(serde_json::json!({ "cleared": true }))
            }
            Err(e) => {
                error!("API: failed to clear action log: {}", e);
                error_from_linkstash(&e)
            }
        }
    }
}

pub fn links_routes() -> actix_web::Scope {
    web::scope("/api")
        .route("/links", web::post().to(LinksService::create_links))
        .route("/links", web::get().to(LinksService::get_all_links))
        .route("/links/{code}/clicks", web::get().to(LinksService::get_clicks))
        .route("/logs", web::get().to(LinksService::get_logs))
        .route("/logs", web::delete().to(LinksService::clear_logs))
}
