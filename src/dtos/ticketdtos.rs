use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::Pagination,
    models::ticketmodel::*,
};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateTicketDto {
    #[validate(length(min = 3, max = 255, message = "Title must be between 3 and 255 characters"))]
    pub title: String,

    #[validate(length(
        min = 10,
        max = 5000,
        message = "Description must be between 10 and 5000 characters"
    ))]
    pub description: String,

    pub category: TicketCategory,

    pub priority: Option<TicketPriority>,
}

/// Partial ticket edit. `assigned_to` distinguishes "absent" from
/// "explicitly null" so an admin can unassign through an update.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateTicketDto {
    #[validate(length(min = 3, max = 255, message = "Title must be between 3 and 255 characters"))]
    pub title: Option<String>,

    #[validate(length(
        min = 10,
        max = 5000,
        message = "Description must be between 10 and 5000 characters"
    ))]
    pub description: Option<String>,

    pub category: Option<TicketCategory>,

    pub priority: Option<TicketPriority>,

    pub status: Option<TicketStatus>,

    #[serde(
        rename = "assignedTo",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "double_option"
    )]
    pub assigned_to: Option<Option<Uuid>>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CommentDto {
    #[validate(length(min = 1, max = 2000, message = "Comment must be between 1 and 2000 characters"))]
    pub comment: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AssignTicketDto {
    #[serde(rename = "assignedTo")]
    pub assigned_to: Option<Uuid>,
}

#[derive(Serialize, Deserialize, Validate, Debug, Default)]
pub struct TicketQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    pub status: Option<TicketStatus>,
    pub category: Option<TicketCategory>,
    pub priority: Option<TicketPriority>,

    #[serde(rename = "assignedTo")]
    pub assigned_to: Option<Uuid>,

    #[serde(rename = "requesterId")]
    pub requester_id: Option<Uuid>,

    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TicketStats {
    pub total: i64,
    pub open: i64,

    #[serde(rename = "inProgress")]
    pub in_progress: i64,

    pub resolved: i64,
    pub closed: i64,
    pub unassigned: i64,

    #[serde(rename = "assignedToMe")]
    pub assigned_to_me: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TicketListData {
    pub tickets: Vec<TicketWithParties>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TicketListResponseDto {
    pub status: String,
    pub data: TicketListData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dto_enforces_field_lengths() {
        let dto = CreateTicketDto {
            title: "ab".to_string(),
            description: "too short".to_string(),
            category: TicketCategory::Hardware,
            priority: None,
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("description"));
    }

    #[test]
    fn comment_bounds_are_one_to_two_thousand() {
        assert!(CommentDto { comment: "".to_string() }.validate().is_err());
        assert!(CommentDto { comment: "still broken".to_string() }.validate().is_ok());
        assert!(CommentDto { comment: "x".repeat(2001) }.validate().is_err());
    }

    #[test]
    fn absent_and_null_assignee_are_distinguished() {
        let absent: UpdateTicketDto = serde_json::from_str(r#"{"status":"resolved"}"#).unwrap();
        assert!(absent.assigned_to.is_none());

        let null: UpdateTicketDto = serde_json::from_str(r#"{"assignedTo":null}"#).unwrap();
        assert_eq!(null.assigned_to, Some(None));

        let set: UpdateTicketDto = serde_json::from_str(
            r#"{"assignedTo":"b5f6bf24-9f31-4a29-92cd-368c1f5f01b2"}"#,
        )
        .unwrap();
        assert!(matches!(set.assigned_to, Some(Some(_))));
    }

    #[test]
    fn query_accepts_wire_format_filters() {
        let q: TicketQueryDto =
            serde_json::from_str(r#"{"status":"in_progress","priority":"critical"}"#).unwrap();
        assert_eq!(q.status, Some(TicketStatus::InProgress));
        assert_eq!(q.priority, Some(TicketPriority::Critical));
    }
}
