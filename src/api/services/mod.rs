pub mod health;
pub mod links;
pub mod redirect;
pub mod shortener;
pub mod stats;

pub use health::{AppStartTime, HealthService, health_routes};
pub use links::{LinksService, links_routes};
pub use redirect::{RedirectService, redirect_routes};
pub use shortener::{ShortenerService, shortener_routes};
pub use stats::{StatsPageService, stats_routes};
