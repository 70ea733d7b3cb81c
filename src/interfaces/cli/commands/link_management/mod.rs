//! Link management commands

mod add;
mod clicks;
mod list;
mod sweep;

pub use add::add_links;
pub use clicks::list_clicks;
pub use list::list_links;
pub use sweep::sweep_expired;
