//! State management module
//!
//! Shared application state and the timer snapshots it hands out.

pub mod app_state;
pub mod timer_state;

pub use app_state::{AppState, TIME_UP_MESSAGE};
pub use timer_state::TimerState;
