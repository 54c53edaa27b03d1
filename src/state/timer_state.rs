//! Timer state snapshot shared with readers

use serde::{Deserialize, Serialize};

use crate::timer::format_hms;

/// Point-in-time view of an exam countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub active: bool,
    pub expired: bool,
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    /// Remaining time rendered as `HH:MM:SS`
    pub formatted: String,
}

impl TimerState {
    /// Snapshot of a running countdown
    pub fn active(total_seconds: u64, remaining_seconds: u64) -> Self {
        Self::new(true, false, total_seconds, remaining_seconds)
    }

    /// Snapshot of a countdown that is not ticking
    pub fn inactive(total_seconds: u64, remaining_seconds: u64) -> Self {
        Self::new(false, false, total_seconds, remaining_seconds)
    }

    /// Snapshot of a countdown that ran out
    pub fn expired(total_seconds: u64) -> Self {
        Self::new(false, true, total_seconds, 0)
    }

    fn new(active: bool, expired: bool, total_seconds: u64, remaining_seconds: u64) -> Self {
        Self {
            active,
            expired,
            total_seconds,
            remaining_seconds,
            formatted: format_hms(remaining_seconds),
        }
    }

    /// Check if the timer is ticking
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Seconds already consumed from the budget
    pub fn elapsed_seconds(&self) -> u64 {
        self.total_seconds - self.remaining_seconds
    }

    /// Label used in API responses
    pub fn status_label(&self) -> &'static str {
        if self.expired {
            "expired"
        } else if self.active {
            "running"
        } else {
            "stopped"
        }
    }
}
