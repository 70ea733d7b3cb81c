//! Mode routing: the HTTP server, or a one-shot CLI command.

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "server")]
pub use server::{app_config, run_server};

#[cfg(feature = "cli")]
pub use cli::run_cli;
