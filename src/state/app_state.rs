//! Main application state management

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::TimerState;
use crate::{
    alerts::AlertBoard,
    storage::ProgressCache,
    timer::{ExamTimer, TimerError},
};

pub use crate::timer::TIME_UP_MESSAGE;

/// Main application state shared by the HTTP handlers and background tasks
#[derive(Debug)]
pub struct AppState {
    /// Exam timers keyed by attempt id
    pub timers: Mutex<HashMap<String, ExamTimer>>,
    pub default_duration_minutes: u64,
    /// Cached answers for in-progress attempts
    pub progress: ProgressCache,
    /// User-facing alerts, fed by timer expiry
    pub alerts: AlertBoard,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(port: u16, host: String, default_duration_minutes: u64, progress_ttl_hours: u32) -> Self {
        Self {
            timers: Mutex::new(HashMap::new()),
            default_duration_minutes,
            progress: ProgressCache::new(progress_ttl_hours),
            alerts: AlertBoard::new(),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the timer for an attempt, creating it first if needed.
    ///
    /// `duration_minutes` only applies to a new timer; an existing timer keeps
    /// its original budget and starting it again is harmless.
    pub fn start_timer(&self, attempt_id: &str, duration_minutes: Option<u64>) -> Result<TimerState, TimerError> {
        let timer = {
            let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
            match timers.get(attempt_id) {
                Some(timer) => timer.clone(),
                None => {
                    let minutes = duration_minutes.unwrap_or(self.default_duration_minutes);
                    let timer = self.create_timer(attempt_id, minutes)?;
                    timers.insert(attempt_id.to_string(), timer.clone());
                    timer
                }
            }
        };

        timer.start()?;
        self.record_action(&format!("start:{}", attempt_id));
        Ok(timer.state())
    }

    /// Stop an attempt's timer. Returns `None` for unknown attempts.
    pub fn stop_timer(&self, attempt_id: &str) -> Option<TimerState> {
        let timer = self.timer(attempt_id)?;
        timer.stop();
        self.record_action(&format!("stop:{}", attempt_id));
        Some(timer.state())
    }

    pub fn timer(&self, attempt_id: &str) -> Option<ExamTimer> {
        self.timers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(attempt_id)
            .cloned()
    }

    pub fn timer_state(&self, attempt_id: &str) -> Option<TimerState> {
        self.timer(attempt_id).map(|timer| timer.state())
    }

    pub fn timer_count(&self) -> usize {
        self.timers.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Number of timers currently ticking
    pub fn active_timer_count(&self) -> usize {
        self.timers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|timer| timer.is_running())
            .count()
    }

    /// Stop and forget an attempt's timer. Returns `false` for unknown attempts.
    pub fn remove_timer(&self, attempt_id: &str) -> bool {
        let removed = self
            .timers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(attempt_id);

        match removed {
            Some(timer) => {
                timer.stop();
                self.record_action(&format!("remove:{}", attempt_id));
                info!("Removed timer for attempt {}", attempt_id);
                true
            }
            None => false,
        }
    }

    /// Drop timers that have not been ticking for at least `retention`.
    /// Returns how many were removed.
    pub fn purge_idle_timers(&self, retention: Duration) -> usize {
        let mut timers = self.timers.lock().unwrap_or_else(|e| e.into_inner());
        let before = timers.len();
        timers.retain(|attempt_id, timer| match timer.idle_for() {
            Some(idle) if idle >= retention => {
                debug!("Purging timer for attempt {} idle for {}s", attempt_id, idle.as_secs());
                false
            }
            _ => true,
        });
        before - timers.len()
    }

    /// Stop every timer, used on shutdown
    pub fn stop_all_timers(&self) {
        let timers: Vec<ExamTimer> = self
            .timers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();

        for timer in &timers {
            timer.stop();
        }
        info!("Stopped {} exam timers", timers.len());
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    pub fn record_action(&self, action: &str) {
        record_action(&self.last_action, &self.last_action_time, action);
    }

    fn create_timer(&self, attempt_id: &str, duration_minutes: u64) -> Result<ExamTimer, TimerError> {
        let timer = ExamTimer::with_alert_sink(duration_minutes, Arc::new(self.alerts.clone()))?;

        let last_action = Arc::clone(&self.last_action);
        let last_action_time = Arc::clone(&self.last_action_time);
        let attempt = attempt_id.to_string();
        timer.on_expire(move || {
            warn!("Exam time expired for attempt {}", attempt);
            record_action(&last_action, &last_action_time, &format!("expired:{}", attempt));
        });

        info!("Created {} minute timer for attempt {}", duration_minutes, attempt_id);
        Ok(timer)
    }
}

fn record_action(
    last_action: &Mutex<Option<String>>,
    last_action_time: &Mutex<Option<DateTime<Utc>>>,
    action: &str,
) {
    if let Ok(mut last_action) = last_action.lock() {
        *last_action = Some(action.to_string());
    }
    if let Ok(mut last_time) = last_action_time.lock() {
        *last_time = Some(Utc::now());
    }
}
