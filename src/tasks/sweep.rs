//! Housekeeping sweep background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::state::AppState;

/// Background task that periodically drops cached progress past its freshness
/// window and timers that have been idle longer than `timer_retention`
pub async fn sweep_task(state: Arc<AppState>, every: Duration, timer_retention: Duration) {
    info!(
        "Starting sweep task, every {}s, timer retention {}s",
        every.as_secs(),
        timer_retention.as_secs()
    );

    let mut interval = interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let purged = state.progress.purge_stale();
        if purged > 0 {
            info!("Purged {} stale progress entries", purged);
        } else {
            debug!("No stale progress entries to purge");
        }

        let removed = state.purge_idle_timers(timer_retention);
        if removed > 0 {
            info!("Removed {} idle exam timers", removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_sweep_keeps_fresh_entries() {
        let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), 180, 24));
        let answers = json!({"q1": "c1"}).as_object().cloned().unwrap();
        state.progress.save("a1", &answers);

        let task = tokio::spawn(sweep_task(
            Arc::clone(&state),
            Duration::from_secs(60),
            Duration::from_secs(3600),
        ));
        tokio::time::sleep(Duration::from_secs(125)).await;
        task.abort();

        assert_eq!(state.progress.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_idle_timers() {
        let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), 180, 24));
        state.start_timer("done", Some(1)).unwrap();
        state.start_timer("ongoing", None).unwrap();

        let task = tokio::spawn(sweep_task(
            Arc::clone(&state),
            Duration::from_secs(60),
            Duration::from_secs(90),
        ));
        // "done" expires at 60s and becomes eligible at 150s, swept at 180s
        tokio::time::sleep(Duration::from_secs(170)).await;
        assert_eq!(state.timer_count(), 2);

        tokio::time::sleep(Duration::from_secs(20)).await;
        task.abort();

        assert_eq!(state.timer_count(), 1);
        assert!(state.timer("ongoing").is_some());
    }
}
