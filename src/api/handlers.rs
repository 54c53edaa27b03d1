//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    alerts::Alert,
    state::AppState,
    storage::Answers,
    utils::{shuffle, validate_form, RegistrationForm},
};
use super::{
    error::ApiError,
    responses::{
        HealthResponse, ProgressResponse, StartTimerRequest, StatusResponse, TimerResponse,
        ValidationResponse,
    },
};

/// Handle POST /timers/:attempt_id/start - Create the attempt timer if needed and start it
pub async fn start_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(attempt_id): Path<String>,
    body: Result<Json<StartTimerRequest>, JsonRejection>,
) -> Result<Json<TimerResponse>, ApiError> {
    let duration_minutes = match body {
        Ok(Json(request)) => request.duration_minutes,
        // a bare POST without a JSON body uses the default duration
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => return Err(ApiError::InvalidBody(rejection.body_text())),
    };
    let timer = state.start_timer(&attempt_id, duration_minutes)?;

    info!("Timer start requested for attempt {}", attempt_id);
    Ok(Json(TimerResponse::new(
        &attempt_id,
        format!("Timer running, {} remaining", timer.formatted),
        timer,
    )))
}

/// Handle POST /timers/:attempt_id/stop - Halt the countdown, e.g. on submission
pub async fn stop_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(attempt_id): Path<String>,
) -> Result<Json<TimerResponse>, ApiError> {
    let timer = state
        .stop_timer(&attempt_id)
        .ok_or_else(|| ApiError::TimerNotFound(attempt_id.clone()))?;

    info!("Timer stop requested for attempt {}", attempt_id);
    Ok(Json(TimerResponse::new(
        &attempt_id,
        format!("Timer stopped with {} remaining", timer.formatted),
        timer,
    )))
}

/// Handle GET /timers/:attempt_id - Current countdown state
pub async fn timer_status_handler(
    State(state): State<Arc<AppState>>,
    Path(attempt_id): Path<String>,
) -> Result<Json<TimerResponse>, ApiError> {
    let timer = state
        .timer_state(&attempt_id)
        .ok_or_else(|| ApiError::TimerNotFound(attempt_id.clone()))?;

    Ok(Json(TimerResponse::new(
        &attempt_id,
        format!("{} remaining", timer.formatted),
        timer,
    )))
}

/// Handle DELETE /timers/:attempt_id - Stop the countdown and forget the timer
pub async fn remove_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(attempt_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.remove_timer(&attempt_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::TimerNotFound(attempt_id))
    }
}

/// Handle GET /progress/:attempt_id - Cached answers, empty when missing or stale
pub async fn load_progress_handler(
    State(state): State<Arc<AppState>>,
    Path(attempt_id): Path<String>,
) -> Json<ProgressResponse> {
    let answers = state.progress.load(&attempt_id);
    debug!("Loaded {} cached answers for attempt {}", answers.len(), attempt_id);
    Json(ProgressResponse { attempt_id, answers })
}

/// Handle PUT /progress/:attempt_id - Cache the current answers
pub async fn save_progress_handler(
    State(state): State<Arc<AppState>>,
    Path(attempt_id): Path<String>,
    Json(answers): Json<Answers>,
) -> Json<ProgressResponse> {
    state.progress.save(&attempt_id, &answers);
    Json(ProgressResponse { attempt_id, answers })
}

/// Handle DELETE /progress/:attempt_id - Forget cached answers
pub async fn clear_progress_handler(
    State(state): State<Arc<AppState>>,
    Path(attempt_id): Path<String>,
) -> StatusCode {
    state.progress.clear(&attempt_id);
    StatusCode::NO_CONTENT
}

/// Handle POST /validate - Check a registration form
pub async fn validate_handler(Json(form): Json<RegistrationForm>) -> Json<ValidationResponse> {
    Json(ValidationResponse::from_errors(validate_form(&form)))
}

/// Handle POST /questions/shuffle - Shuffled copy of the posted items
pub async fn shuffle_handler(Json(items): Json<Vec<Value>>) -> Json<Vec<Value>> {
    Json(shuffle(&items))
}

/// Handle GET /alerts - Alerts that have not been dismissed
pub async fn list_alerts_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Alert>> {
    Json(state.alerts.active())
}

/// Handle DELETE /alerts/:id - Dismiss an alert
pub async fn dismiss_alert_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    if state.alerts.dismiss(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::AlertNotFound(id))
    }
}

/// Handle GET /status - Return current server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        active_timers: state.active_timer_count(),
        total_timers: state.timer_count(),
        cached_attempts: state.progress.len(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
