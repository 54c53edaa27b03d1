//! API error type

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::timer::TimerError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No timer for attempt {0}")]
    TimerNotFound(String),

    #[error("No alert with id {0}")]
    AlertNotFound(u64),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Timer(#[from] TimerError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::TimerNotFound(_) | ApiError::AlertNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Timer(TimerError::InvalidDuration(_) | TimerError::DurationOverflow(_)) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Timer(TimerError::RuntimeUnavailable) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        (status, Json(json!({ "status": "error", "message": self.to_string() }))).into_response()
    }
}
