//! CLI command implementations

pub mod config_management;
mod link_management;
mod log_management;

pub use link_management::*;
pub use log_management::*;
