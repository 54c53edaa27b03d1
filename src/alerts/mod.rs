//! User-facing alert notifications
//!
//! The timer reports expiry through an [`AlertSink`]; [`AlertBoard`] is the
//! in-memory sink served over the HTTP API.

pub mod alert;
pub mod board;

pub use alert::{Alert, AlertKind, AlertOptions, DEFAULT_ALERT_TIMEOUT_MS};
pub use board::{AlertBoard, AlertEvent};

/// Destination for user-facing notifications
pub trait AlertSink: Send + Sync {
    /// Publish an alert and return what was recorded
    fn show(&self, message: &str, kind: AlertKind, options: AlertOptions) -> Alert;
}
