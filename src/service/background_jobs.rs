use std::time::Duration;

use super::notification_service::NotificationDispatcher;

const SWEEP_INTERVAL_SECS: u64 = 30;

/// Spawns the periodic task that drains the email notification queue.
pub fn start_notification_sweep(dispatcher: NotificationDispatcher) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            match dispatcher.process_pending().await {
                Ok(0) => {}
                Ok(sent) => tracing::debug!("Notification sweep processed {} emails", sent),
                Err(e) => tracing::error!("Notification sweep failed: {}", e),
            }
        }
    });
}
