//! Exam countdown timer
//!
//! [`Countdown`] holds the tick algorithm, [`ExamTimer`] schedules it on the
//! tokio runtime once per second.

pub mod countdown;
pub mod error;
pub mod exam_timer;
pub mod format;

pub use countdown::{Countdown, Observer, ObserverId, TickOutcome};
pub use error::TimerError;
pub use exam_timer::{ExamTimer, ExpiryHandler, TICK_PERIOD, TIME_UP_MESSAGE};
pub use format::format_hms;
