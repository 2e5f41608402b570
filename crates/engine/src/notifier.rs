use events::{DashboardEvent, LogLevel, Notification};
use tokio::sync::broadcast;

/// A long-running task that listens to the dashboard's event channel and surfaces
/// every `Notification` to the user without blocking the session.
///
/// Returns the number of notifications shown once the channel closes, which
/// happens when the `Dashboard` is dropped.
pub async fn run_notifier(mut event_rx: broadcast::Receiver<DashboardEvent>) -> usize {
    let mut shown = 0;

    loop {
        match event_rx.recv().await {
            Ok(DashboardEvent::Notification(notification)) => {
                show(&notification);
                shown += 1;
            }
            // Everything else is bookkeeping for other subscribers.
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!("Notifier lagged, skipped {} events.", n);
            }
            Err(broadcast::error::RecvError::Closed) => {
                tracing::debug!("Event channel closed. Notifier shutting down.");
                break;
            }
        }
    }

    shown
}

fn show(notification: &Notification) {
    match notification.level {
        LogLevel::Warn => tracing::warn!(at = %notification.timestamp, "{}", notification.message),
        LogLevel::Error => tracing::error!(at = %notification.timestamp, "{}", notification.message),
    }
}
