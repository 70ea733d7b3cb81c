//! linkstash - a small self-hosted URL shortener
//!
//! Batches of up to five URLs become short codes with an expiry. Every
//! resolution appends a click record, and every state change leaves an
//! entry in an action log. All state lives in a JSON key-value store.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Command-line interface (default)
//!
//! # Architecture
//! - `storage`: key-value backends and persisted record types
//! - `store`: action dispatch, reducer and middleware
//! - `services`: batch creation, redirect resolution, statistics
//! - `api`: HTTP handlers and HTML views
//! - `interfaces`: CLI commands
//! - `config`: configuration management
//! - `runtime`: application wiring and execution modes
//! - `system`: logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod store;
pub mod system;
pub mod utils;
