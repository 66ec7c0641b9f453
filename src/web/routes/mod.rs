//! Contains all the routes that this application can handle.

mod health;
mod home;
mod subscribe;

use crate::AppState;
use health::health_check;
use home::home;
use subscribe::subscribe;

use axum::{
    routing::{get, post},
    Router,
};

/// All the routes of the server
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/subscribe", post(subscribe))
        .with_state(app_state)
}
