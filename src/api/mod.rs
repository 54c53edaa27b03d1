//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod error;
pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

pub use error::ApiError;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/timers/:attempt_id",
            get(timer_status_handler).delete(remove_timer_handler),
        )
        .route("/timers/:attempt_id/start", post(start_timer_handler))
        .route("/timers/:attempt_id/stop", post(stop_timer_handler))
        .route(
            "/progress/:attempt_id",
            get(load_progress_handler)
                .put(save_progress_handler)
                .delete(clear_progress_handler),
        )
        .route("/validate", post(validate_handler))
        .route("/questions/shuffle", post(shuffle_handler))
        .route("/alerts", get(list_alerts_handler))
        .route("/alerts/:id", delete(dismiss_alert_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
