//! Root creation form

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, web};
use tracing::{debug, error};

use crate::api::helpers::html_response;
use crate::api::views::{self, FormError, FormOutcome, FormRow};
use crate::services::{CreateLinkItem, LinkService};
use crate::store::DispatchContext;

pub struct ShortenerService;

impl ShortenerService {
    pub async fn form(links: web::Data<Arc<LinkService>>) -> impl Responder {
        let config = links.config();
        let rows = vec![FormRow::default(); config.max_batch];
        html_response(
            StatusCode::OK,
            views::form_page(&rows, None, &config.public_host, config.default_validity_mins),
        )
    }

    pub async fn submit(
        req: HttpRequest,
        form: web::Form<HashMap<String, String>>,
        links: web::Data<Arc<LinkService>>,
    ) -> impl Responder {
        let config = links.config();
        let rows = Self::parse_rows(&form, config.max_batch);

        // Only rows with a URL are submitted; remember which form row each came from
        let (row_numbers, items): (Vec<usize>, Vec<CreateLinkItem>) = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| !row.url.trim().is_empty())
            .map(|(i, row)| (i + 1, Self::to_item(row)))
            .unzip();
        debug!("Form submission with {} filled rows", items.len());

        let ctx = DispatchContext::new(req.path());
        let outcome = match links.create_many(items, &ctx).await {
            Ok(batch) => FormOutcome::from_batch(batch.results, batch.errors, &row_numbers),
            Err(e) => {
                error!("Failed to save links: {}", e);
                FormOutcome {
                    created: Vec::new(),
                    errors: vec![FormError {
                        row: None,
                        message: format!("Could not save links: {}", e.message()),
                    }],
                }
            }
        };

        let status = if outcome.created.is_empty() && !outcome.errors.is_empty() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::OK
        };

        html_response(
            status,
            views::form_page(
                &rows,
                Some(&outcome),
                &config.public_host,
                config.default_validity_mins,
            ),
        )
    }

    /// Reads `url_N`, `validity_N`, `code_N` for N in `1..=count`
    fn parse_rows(form: &HashMap<String, String>, count: usize) -> Vec<FormRow> {
        let field = |name: &str, n: usize| form.get(&format!("{name}_{n}")).cloned().unwrap_or_default();
        (1..=count)
            .map(|n| FormRow {
                url: field("url", n),
                validity: field("validity", n),
                code: field("code", n),
            })
            .collect()
    }

    fn to_item(row: &FormRow) -> CreateLinkItem {
        let mut item = CreateLinkItem::new(row.url.trim());
        if !row.validity.trim().is_empty() {
            item = item.with_validity(row.validity.trim());
        }
        if !row.code.trim().is_empty() {
            item = item.with_code(row.code.trim());
        }
        item
    }
}

pub fn shortener_routes() -> actix_web::Resource {
    web::resource("/")
        .route(web::get().to(ShortenerService::form))
        .route(web::post().to(ShortenerService::submit))
}
