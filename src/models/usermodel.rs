use chrono::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    EndUser,
    ItUser,
    ItAdmin,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::EndUser => "end_user",
            UserRole::ItUser => "it_user",
            UserRole::ItAdmin => "it_admin",
        }
    }

    /// IT staff covers both it_user and it_admin.
    pub fn is_it_staff(&self) -> bool {
        match self {
            UserRole::EndUser => false,
            UserRole::ItUser | UserRole::ItAdmin => true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: uuid::Uuid,
    pub email: String,

    #[serde(skip_serializing)]
    pub password: String,

    #[serde(rename = "firstName")]
    pub first_name: String,

    #[serde(rename = "lastName")]
    pub last_name: String,

    pub role: UserRole,
    pub department: Option<String>,
    pub phone: Option<String>,

    #[serde(rename = "isActive")]
    pub is_active: bool,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&UserRole::EndUser).unwrap(),
            "\"end_user\""
        );
        assert_eq!(
            serde_json::from_str::<UserRole>("\"it_admin\"").unwrap(),
            UserRole::ItAdmin
        );
    }

    #[test]
    fn it_staff_covers_both_it_roles() {
        assert!(!UserRole::EndUser.is_it_staff());
        assert!(UserRole::ItUser.is_it_staff());
        assert!(UserRole::ItAdmin.is_it_staff());
    }
}
