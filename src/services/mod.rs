//! Service layer for business logic
//!
//! Shared by the HTTP handlers and the CLI.

mod link_service;
mod redirect;
mod stats;

pub use link_service::*;
pub use redirect::*;
pub use stats::*;
