//! Timer error types

use thiserror::Error;

/// Errors raised while creating or starting an exam timer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimerError {
    #[error("Timer duration must be positive, got {0} minutes")]
    InvalidDuration(u64),

    #[error("Timer duration of {0} minutes does not fit in a seconds counter")]
    DurationOverflow(u64),

    #[error("No async runtime is available to schedule timer ticks")]
    RuntimeUnavailable,
}
