use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{ACCEPT_LANGUAGE, HeaderName, REFERER};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use tracing::{debug, trace};

use crate::api::helpers::html_response;
use crate::api::views;
use crate::services::{RedirectOutcome, Redirector, VisitContext};
use crate::store::DispatchContext;

pub struct RedirectService;

impl RedirectService {
    /// `GET /{code}`
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        redirector: web::Data<Arc<Redirector>>,
    ) -> impl Responder {
        let code = path.into_inner();
        let visit = Self::visit_context(&req);
        let ctx = DispatchContext::new(req.path());

        match redirector.resolve(&code, &visit, &ctx).await {
            RedirectOutcome::Missing => {
                html_response(StatusCode::NOT_FOUND, views::missing_page(&code))
            }
            RedirectOutcome::Expired(link) => {
                html_response(StatusCode::GONE, views::expired_page(&link))
            }
            RedirectOutcome::Ok { link, .. } => {
                let delay = redirector.delay();
                if !delay.is_zero() {
                    trace!("Delaying redirect for {:?}", delay);
                    tokio::time::sleep(delay).await;
                }
                debug!("Redirecting {} -> {}", code, link.url);
                Self::finish_redirect(&link.url)
            }
        }
    }

    fn visit_context(req: &HttpRequest) -> VisitContext {
        let header = |name: HeaderName| {
            req.headers()
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(String::from)
        };
        VisitContext {
            referrer: header(REFERER),
            accept_language: header(ACCEPT_LANGUAGE),
        }
    }

    #[inline]
    fn finish_redirect(target: &str) -> HttpResponse {
        HttpResponse::TemporaryRedirect()
            .insert_header(("Location", target))
            .insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
            .finish()
    }
}

/// Catch-all; register after every other service
pub fn redirect_routes() -> actix_web::Scope {
    web::scope("").route("/{code}", web::get().to(RedirectService::handle_redirect))
}
