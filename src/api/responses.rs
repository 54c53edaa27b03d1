//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{state::TimerState, storage::Answers};

/// Optional body of `POST /timers/:attempt_id/start`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartTimerRequest {
    pub duration_minutes: Option<u64>,
}

/// Response for timer endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub attempt_id: String,
    pub timer: TimerState,
}

impl TimerResponse {
    pub fn new(attempt_id: &str, message: String, timer: TimerState) -> Self {
        Self {
            status: timer.status_label().to_string(),
            message,
            timestamp: Utc::now(),
            attempt_id: attempt_id.to_string(),
            timer,
        }
    }
}

/// Cached answers for an attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub attempt_id: String,
    pub answers: Answers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResponse {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Server status with timer overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub active_timers: usize,
    pub total_timers: usize,
    pub cached_attempts: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
