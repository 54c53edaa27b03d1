//! Exam Clock - countdown timers and helpers for timed mock exams
//!
//! This library provides the per-attempt exam countdown, a short-lived cache
//! of in-progress answers, user-facing alerts and form validation, plus the
//! HTTP API that serves them.

pub mod alerts;
pub mod api;
pub mod config;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::{AppState, TimerState};
pub use timer::{format_hms, Countdown, ExamTimer, TimerError};
pub use utils::signals::shutdown_signal;
