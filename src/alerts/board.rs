//! In-memory alert board with timed dismissal

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};
use chrono::Utc;
use tokio::{runtime::Handle, sync::broadcast, time::sleep};
use tracing::{debug, info, warn};

use super::{Alert, AlertKind, AlertOptions, AlertSink};

/// Change notifications published by the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertEvent {
    Shown(Alert),
    Dismissed(u64),
}

#[derive(Debug)]
struct BoardInner {
    alerts: Mutex<Vec<Alert>>,
    next_id: AtomicU64,
    events_tx: broadcast::Sender<AlertEvent>,
}

/// Collects alerts for display and dismisses auto-hiding ones after their
/// timeout. Cloning shares the same board.
#[derive(Debug, Clone)]
pub struct AlertBoard {
    inner: Arc<BoardInner>,
}

impl AlertBoard {
    pub fn new() -> Self {
        let (events_tx, _) = broadcast::channel(100);
        Self {
            inner: Arc::new(BoardInner {
                alerts: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                events_tx,
            }),
        }
    }

    /// Alerts that have not been dismissed, oldest first
    pub fn active(&self) -> Vec<Alert> {
        self.inner.lock().clone()
    }

    /// Remove an alert. Unknown ids are ignored.
    pub fn dismiss(&self, id: u64) -> bool {
        self.inner.dismiss(id)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AlertEvent> {
        self.inner.events_tx.subscribe()
    }

    fn schedule_dismissal(&self, id: u64, timeout_ms: u64) {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("Failed to schedule auto-dismiss for alert {}: {}", id, e);
                return;
            }
        };

        let board = Arc::downgrade(&self.inner);
        runtime.spawn(async move {
            sleep(Duration::from_millis(timeout_ms)).await;
            if let Some(board) = board.upgrade() {
                board.dismiss(id);
            }
        });
    }
}

impl Default for AlertBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl AlertSink for AlertBoard {
    fn show(&self, message: &str, kind: AlertKind, options: AlertOptions) -> Alert {
        let alert = Alert {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            kind,
            message: message.to_string(),
            created_at: Utc::now(),
            auto_hide: options.auto_hide,
            timeout_ms: options.resolved_timeout_ms(),
        };

        info!(id = alert.id, kind = kind.as_str(), "Alert: {}", alert.message);
        self.inner.lock().push(alert.clone());

        if self.inner.events_tx.send(AlertEvent::Shown(alert.clone())).is_err() {
            debug!("No alert subscribers for alert {}", alert.id);
        }

        if alert.auto_hide {
            self.schedule_dismissal(alert.id, alert.timeout_ms);
        }

        alert
    }
}

impl BoardInner {
    fn lock(&self) -> MutexGuard<'_, Vec<Alert>> {
        self.alerts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn dismiss(&self, id: u64) -> bool {
        let mut alerts = self.lock();
        let before = alerts.len();
        alerts.retain(|alert| alert.id != id);
        let removed = alerts.len() != before;
        drop(alerts);

        if !removed {
            debug!("Alert {} already dismissed", id);
            return false;
        }

        debug!("Alert {} dismissed", id);
        let _ = self.events_tx.send(AlertEvent::Dismissed(id));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sticky_alert_without_runtime() {
        let board = AlertBoard::new();
        let alert = board.show("Saved", AlertKind::Success, AlertOptions::sticky());

        assert_eq!(alert.id, 1);
        assert_eq!(board.active(), vec![alert.clone()]);
        assert!(board.dismiss(alert.id));
        assert!(!board.dismiss(alert.id));
        assert!(board.active().is_empty());
    }

    #[test]
    fn test_auto_hide_without_runtime_is_suppressed() {
        let board = AlertBoard::new();
        board.show("No runtime", AlertKind::Info, AlertOptions::default());
        assert_eq!(board.active().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_hide_dismisses_after_timeout() {
        let board = AlertBoard::new();
        let alert = board.show("Heads up", AlertKind::Warning, AlertOptions::default());
        board.show("Pinned", AlertKind::Info, AlertOptions::sticky());

        sleep(Duration::from_millis(5_900)).await;
        assert_eq!(board.active().len(), 2);

        sleep(Duration::from_millis(200)).await;
        let remaining = board.active();
        assert_eq!(remaining.len(), 1);
        assert!(remaining.iter().all(|a| a.id != alert.id));
    }

    #[tokio::test]
    async fn test_events_are_broadcast() {
        let board = AlertBoard::new();
        let mut rx = board.subscribe();

        let alert = board.show("Hello", AlertKind::Primary, AlertOptions::sticky());
        board.dismiss(alert.id);

        assert_eq!(rx.recv().await.unwrap(), AlertEvent::Shown(alert.clone()));
        assert_eq!(rx.recv().await.unwrap(), AlertEvent::Dismissed(alert.id));
    }
}
