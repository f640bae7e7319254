// src/models/ticketmodel.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq)]
#[sqlx(type_name = "ticket_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn to_str(&self) -> &str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq)]
#[sqlx(type_name = "ticket_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TicketPriority {
    pub fn to_str(&self) -> &str {
        match self {
            TicketPriority::Low => "low",
            TicketPriority::Medium => "medium",
            TicketPriority::High => "high",
            TicketPriority::Critical => "critical",
        }
    }
}

impl Default for TicketPriority {
    fn default() -> Self {
        TicketPriority::Medium
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Default)]
#[sqlx(type_name = "ticket_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketCategory {
    Hardware,
    Software,
    Network,
    Access,
    #[default]
    Other,
}

impl TicketCategory {
    pub fn to_str(&self) -> &str {
        match self {
            TicketCategory::Hardware => "hardware",
            TicketCategory::Software => "software",
            TicketCategory::Network => "network",
            TicketCategory::Access => "access",
            TicketCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq)]
#[sqlx(type_name = "ticket_update_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    StatusChange,
    Assignment,
    Comment,
    PriorityChange,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: TicketCategory,
    pub priority: TicketPriority,
    pub status: TicketStatus,

    #[serde(rename = "requesterId")]
    pub requester_id: Uuid,

    #[serde(rename = "assignedTo")]
    pub assigned_to: Option<Uuid>,

    #[serde(rename = "resolvedAt")]
    pub resolved_at: Option<DateTime<Utc>>,

    #[serde(rename = "closedAt")]
    pub closed_at: Option<DateTime<Utc>>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Ticket row joined with the names and emails of its requester and
/// (optional) assignee, for API responses and notification addressing.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TicketWithParties {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub ticket: Ticket,

    #[serde(rename = "requesterName")]
    pub requester_name: String,

    #[serde(rename = "requesterEmail")]
    pub requester_email: String,

    #[serde(rename = "assigneeName")]
    pub assignee_name: Option<String>,

    #[serde(rename = "assigneeEmail")]
    pub assignee_email: Option<String>,
}

/// Append-only audit entry. One row per atomic field change or comment.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TicketUpdate {
    pub id: Uuid,

    #[serde(rename = "ticketId")]
    pub ticket_id: Uuid,

    #[serde(rename = "updatedBy")]
    pub updated_by: Uuid,

    #[serde(rename = "updateType")]
    pub update_type: UpdateType,

    #[serde(rename = "oldValue")]
    pub old_value: Option<String>,

    #[serde(rename = "newValue")]
    pub new_value: Option<String>,

    pub comment: Option<String>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TicketUpdateWithUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub update: TicketUpdate,

    #[serde(rename = "updaterName")]
    pub updater_name: String,

    #[serde(rename = "updaterEmail")]
    pub updater_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&TicketStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::from_str::<TicketCategory>("\"access\"").unwrap(),
            TicketCategory::Access
        );
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(TicketPriority::default(), TicketPriority::Medium);
    }
}
