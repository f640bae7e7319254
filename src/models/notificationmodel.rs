// src/models/notificationmodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq)]
#[sqlx(type_name = "notification_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

/// Queued outbound email tied to a ticket. Delivery is asynchronous:
/// rows start pending and move to sent or failed, never back by
/// themselves; failed rows wait for an explicit reset.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmailNotification {
    pub id: Uuid,

    #[serde(rename = "ticketId")]
    pub ticket_id: Uuid,

    #[serde(rename = "recipientEmail")]
    pub recipient_email: String,

    pub subject: String,
    pub body: String,
    pub status: NotificationStatus,

    #[serde(rename = "errorMessage")]
    pub error_message: Option<String>,

    #[serde(rename = "sentAt")]
    pub sent_at: Option<DateTime<Utc>>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
