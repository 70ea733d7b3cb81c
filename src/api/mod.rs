//! HTTP surface: creation form, statistics page, JSON API and the
//! catch-all redirect route.

pub mod helpers;
pub mod services;
pub mod views;

pub use helpers::{ApiResponse, ErrorCode};
