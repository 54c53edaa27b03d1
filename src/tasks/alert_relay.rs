//! Alert relay background task

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::alerts::AlertEvent;

/// Background task that mirrors alert board activity into the server log.
/// Returns the number of alerts seen once the board is dropped.
pub async fn alert_relay_task(mut events: broadcast::Receiver<AlertEvent>) -> u64 {
    info!("Starting alert relay task");

    let mut shown = 0;
    loop {
        match events.recv().await {
            Ok(AlertEvent::Shown(alert)) => {
                shown += 1;
                info!(
                    id = alert.id,
                    kind = alert.kind.as_str(),
                    auto_hide = alert.auto_hide,
                    "Alert shown: {}",
                    alert.message
                );
            }
            Ok(AlertEvent::Dismissed(id)) => {
                debug!("Alert {} dismissed", id);
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Alert relay lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Alert channel closed, stopping alert relay task");
                break;
            }
        }
    }
    shown
}
