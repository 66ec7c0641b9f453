//! A newsletter subscription backend.
//!
//! `POST /subscribe` stores a new email address in the [`registry`] and fires two detached
//! notifications through the configured [`dispatch`] backend: a welcome email for the subscriber
//! and an alert for the admin.

pub mod app;
pub mod config;
pub mod database;
pub mod dispatch;
pub mod domain;
mod error;
pub mod registry;
pub mod subscription;
pub mod templ_manager;
pub mod utils;
pub mod web;

// re-exports
pub use app::{App, AppState};
pub use error::{Error, Result};
pub use web::serve;

use tracing_subscriber::EnvFilter;

/// Human readable console logging used for debug builds.
/// Honors `RUST_LOG`, defaults to `debug`.
pub fn init_dbg_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    // `try_init` so that tests can call this more than once.
    let _ = tracing_subscriber::fmt()
        .without_time()
        .with_target(false)
        .with_env_filter(filter)
        .compact()
        .try_init();
}

/// JSON logging used for release builds.
/// Honors `RUST_LOG`, defaults to `info`.
pub fn init_production_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_env_filter(filter)
        .try_init();
}
