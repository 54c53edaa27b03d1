//! Short-lived storage for in-progress exam answers

pub mod progress;

pub use progress::{progress_key, Answers, ProgressCache, DEFAULT_PROGRESS_TTL_HOURS};
