use std::sync::Arc;
use std::time::Duration;

use crate::db::db::DBClient;
use crate::db::notificationdb::NotificationExt;
use crate::mail::sendmail::send_email;
use crate::models::notificationmodel::EmailNotification;

use super::error::ServiceError;

/// How many queued notifications one sweep picks up.
const SWEEP_BATCH_SIZE: i64 = 10;

/// Pause between consecutive sends so a burst of tickets does not
/// hammer the mail provider.
const INTER_SEND_DELAY_MS: u64 = 100;

/// Queues outbound ticket emails and drains the queue in batches.
///
/// Queue writes are fire-and-forget from the caller's point of view: a
/// failed insert is logged and never surfaces to the API response.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    db_client: Arc<DBClient>,
}

impl NotificationDispatcher {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        NotificationDispatcher { db_client }
    }

    /// Records a pending notification for the sweep to pick up. Queue
    /// failures are logged, never propagated.
    pub async fn submit(
        &self,
        ticket_id: uuid::Uuid,
        recipient_email: &str,
        subject: &str,
        body: &str,
    ) -> Option<uuid::Uuid> {
        match self
            .db_client
            .queue_notification(
                ticket_id,
                recipient_email.to_string(),
                subject.to_string(),
                body.to_string(),
            )
            .await
        {
            Ok(notification) => Some(notification.id),
            Err(e) => {
                tracing::error!(
                    "Failed to queue notification for ticket {}: {}",
                    ticket_id,
                    e
                );
                None
            }
        }
    }

    /// Sends the oldest pending notifications, marking each sent or
    /// failed. Returns how many were attempted.
    pub async fn process_pending(&self) -> Result<usize, ServiceError> {
        let pending = self
            .db_client
            .get_pending_notifications(SWEEP_BATCH_SIZE)
            .await?;

        let count = pending.len();
        for notification in pending {
            self.deliver(&notification).await;
            tokio::time::sleep(Duration::from_millis(INTER_SEND_DELAY_MS)).await;
        }

        Ok(count)
    }

    async fn deliver(&self, notification: &EmailNotification) {
        match send_email(
            &notification.recipient_email,
            &notification.subject,
            &notification.body,
        )
        .await
        {
            Ok(()) => {
                tracing::info!(
                    "Sent notification {} to {}",
                    notification.id,
                    notification.recipient_email
                );
                if let Err(e) = self.db_client.mark_notification_sent(notification.id).await {
                    tracing::error!("Failed to mark notification {} sent: {}", notification.id, e);
                }
            }
            Err(error) => {
                tracing::warn!(
                    "Notification {} to {} failed: {}",
                    notification.id,
                    notification.recipient_email,
                    error
                );
                if let Err(e) = self
                    .db_client
                    .mark_notification_failed(notification.id, error)
                    .await
                {
                    tracing::error!(
                        "Failed to mark notification {} failed: {}",
                        notification.id,
                        e
                    );
                }
            }
        }
    }

    /// Moves failed notifications back to pending so the next sweep
    /// retries them. Returns how many were reset.
    pub async fn retry_failed(&self) -> Result<u64, ServiceError> {
        let reset = self.db_client.reset_failed_notifications().await?;
        if reset > 0 {
            tracing::info!("Requeued {} failed notifications", reset);
        }
        Ok(reset)
    }
}
