// db/notificationdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::models::notificationmodel::{EmailNotification, NotificationStatus};

#[async_trait]
pub trait NotificationExt {
    async fn queue_notification(
        &self,
        ticket_id: Uuid,
        recipient_email: String,
        subject: String,
        body: String,
    ) -> Result<EmailNotification, sqlx::Error>;

    /// Oldest pending rows first; the sweep drains them in batches.
    async fn get_pending_notifications(
        &self,
        limit: i64,
    ) -> Result<Vec<EmailNotification>, sqlx::Error>;

    async fn mark_notification_sent(
        &self,
        notification_id: Uuid,
    ) -> Result<EmailNotification, sqlx::Error>;

    async fn mark_notification_failed(
        &self,
        notification_id: Uuid,
        error_message: String,
    ) -> Result<EmailNotification, sqlx::Error>;

    /// Flip every failed row back to pending so the sweep retries it.
    async fn reset_failed_notifications(&self) -> Result<u64, sqlx::Error>;

    async fn get_ticket_notifications(
        &self,
        ticket_id: Uuid,
    ) -> Result<Vec<EmailNotification>, sqlx::Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn queue_notification(
        &self,
        ticket_id: Uuid,
        recipient_email: String,
        subject: String,
        body: String,
    ) -> Result<EmailNotification, sqlx::Error> {
        sqlx::query_as::<_, EmailNotification>(
            r#"
            INSERT INTO email_notifications (ticket_id, recipient_email, subject, body, status)
            VALUES ($1, $2, $3, $4, 'pending'::notification_status)
            RETURNING id, ticket_id, recipient_email, subject, body, status,
                      error_message, sent_at, created_at
            "#,
        )
        .bind(ticket_id)
        .bind(recipient_email)
        .bind(subject)
        .bind(body)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_pending_notifications(
        &self,
        limit: i64,
    ) -> Result<Vec<EmailNotification>, sqlx::Error> {
        sqlx::query_as::<_, EmailNotification>(
            r#"
            SELECT id, ticket_id, recipient_email, subject, body, status,
                   error_message, sent_at, created_at
            FROM email_notifications
            WHERE status = $1
            ORDER BY created_at ASC
            LIMIT $2
            "#,
        )
        .bind(NotificationStatus::Pending)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    async fn mark_notification_sent(
        &self,
        notification_id: Uuid,
    ) -> Result<EmailNotification, sqlx::Error> {
        sqlx::query_as::<_, EmailNotification>(
            r#"
            UPDATE email_notifications
            SET status = $2,
                error_message = NULL,
                sent_at = NOW()
            WHERE id = $1
            RETURNING id, ticket_id, recipient_email, subject, body, status,
                      error_message, sent_at, created_at
            "#,
        )
        .bind(notification_id)
        .bind(NotificationStatus::Sent)
        .fetch_one(&self.pool)
        .await
    }

    async fn mark_notification_failed(
        &self,
        notification_id: Uuid,
        error_message: String,
    ) -> Result<EmailNotification, sqlx::Error> {
        sqlx::query_as::<_, EmailNotification>(
            r#"
            UPDATE email_notifications
            SET status = $2,
                error_message = $3
            WHERE id = $1
            RETURNING id, ticket_id, recipient_email, subject, body, status,
                      error_message, sent_at, created_at
            "#,
        )
        .bind(notification_id)
        .bind(NotificationStatus::Failed)
        .bind(error_message)
        .fetch_one(&self.pool)
        .await
    }

    async fn reset_failed_notifications(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE email_notifications
            SET status = $1,
                error_message = NULL
            WHERE status = $2
            "#,
        )
        .bind(NotificationStatus::Pending)
        .bind(NotificationStatus::Failed)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn get_ticket_notifications(
        &self,
        ticket_id: Uuid,
    ) -> Result<Vec<EmailNotification>, sqlx::Error> {
        sqlx::query_as::<_, EmailNotification>(
            r#"
            SELECT id, ticket_id, recipient_email, subject, body, status,
                   error_message, sent_at, created_at
            FROM email_notifications
            WHERE ticket_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await
    }
}
