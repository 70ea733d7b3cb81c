//! Server mode

use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::api::helpers::json_error_handler;
use crate::api::services::{
    AppStartTime, health_routes, links_routes, redirect_routes, shortener_routes, stats_routes,
};
use crate::config::Config;
use crate::runtime::AppContext;
use crate::runtime::lifetime;

/// Registers shared state and every route. The redirect catch-all goes last.
pub fn app_config(ctx: &AppContext, start_time: &AppStartTime, cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::Data::new(ctx.link_service.clone()))
        .app_data(web::Data::new(ctx.redirector.clone()))
        .app_data(web::Data::new(ctx.stats.clone()))
        .app_data(web::Data::new(ctx.action_log.clone()))
        .app_data(web::Data::new(start_time.clone()))
        .app_data(
            web::JsonConfig::default()
                .limit(64 * 1024)
                .error_handler(json_error_handler),
        )
        .app_data(web::FormConfig::default().limit(64 * 1024))
        .service(shortener_routes())
        .service(stats_routes())
        .service(health_routes())
        .service(links_routes())
        .service(redirect_routes());
}

/// Run the HTTP server until it stops or Ctrl+C arrives.
///
/// Logging must be initialized before calling this.
pub async fn run_server(config: &Config) -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let ctx = AppContext::prepare(config).await.map_err(|e| {
        error!("Server startup failed: {}", e);
        anyhow::anyhow!(e.format_simple())
    })?;

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!(
        "Short links will be shown under {}",
        ctx.link_service.config().public_host
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .configure(|cfg| app_config(&ctx, &app_start_time, cfg))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000));

    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown");
        }
    }

    Ok(())
}
