use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{dtos::Pagination, models::usermodel::*};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(
        length(min = 6, message = "Password must be at least 6 characters"),
        custom = "validate_password_strength"
    )]
    pub password: String,

    #[validate(length(min = 2, max = 100, message = "First name must be between 2-100 characters"))]
    #[serde(rename = "firstName")]
    pub first_name: String,

    #[validate(length(min = 2, max = 100, message = "Last name must be between 2-100 characters"))]
    #[serde(rename = "lastName")]
    pub last_name: String,

    pub role: Option<UserRole>,

    #[validate(length(max = 100, message = "Department must be less than 100 characters"))]
    pub department: Option<String>,

    #[validate(custom = "validate_phone_number")]
    pub phone: Option<String>,
}

// The regex crate has no lookahead, so password classes are checked by hand.
fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_lower && has_upper && has_digit {
        Ok(())
    } else {
        let mut error = ValidationError::new("weak_password");
        error.message = Some(Cow::from(
            "Password must contain at least one uppercase letter, one lowercase letter, and one number",
        ));
        Err(error)
    }
}

fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    let phone_regex = regex::Regex::new(r"^(\+?[0-9]{1,3}[- ]?)?[0-9]{3}[- ]?[0-9]{3}[- ]?[0-9]{4}$")
        .map_err(|_| ValidationError::new("invalid_phone_regex"))?;

    if phone_regex.is_match(phone) {
        Ok(())
    } else {
        let mut error = ValidationError::new("invalid_phone");
        error.message = Some(Cow::from(
            "Phone number must be in a valid format (e.g., +1234567890 or 123-456-7890)",
        ));
        Err(error)
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateProfileDto {
    #[validate(length(min = 2, max = 100, message = "First name must be between 2-100 characters"))]
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,

    #[validate(length(min = 2, max = 100, message = "Last name must be between 2-100 characters"))]
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,

    #[validate(length(max = 100, message = "Department must be less than 100 characters"))]
    pub department: Option<String>,

    #[validate(custom = "validate_phone_number")]
    pub phone: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "Current password is required"))]
    #[serde(rename = "currentPassword")]
    pub current_password: String,

    #[validate(
        length(min = 6, message = "New password must be at least 6 characters"),
        custom = "validate_password_strength"
    )]
    #[serde(rename = "newPassword")]
    pub new_password: String,

    #[validate(must_match(other = "new_password", message = "Password confirmation does not match"))]
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

/// Admin edit of another user. Every field optional; absent fields are
/// left untouched.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateUserDto {
    #[validate(length(min = 2, max = 100, message = "First name must be between 2-100 characters"))]
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,

    #[validate(length(min = 2, max = 100, message = "Last name must be between 2-100 characters"))]
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,

    pub role: Option<UserRole>,

    #[validate(length(max = 100, message = "Department must be less than 100 characters"))]
    pub department: Option<String>,

    #[validate(custom = "validate_phone_number")]
    pub phone: Option<String>,

    #[serde(rename = "isActive")]
    pub is_active: Option<bool>,
}

#[derive(Serialize, Deserialize, Validate, Debug, Default)]
pub struct UserQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    pub role: Option<UserRole>,
    pub department: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub email: String,

    #[serde(rename = "firstName")]
    pub first_name: String,

    #[serde(rename = "lastName")]
    pub last_name: String,

    pub role: String,
    pub department: Option<String>,
    pub phone: Option<String>,

    #[serde(rename = "isActive")]
    pub is_active: bool,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            email: user.email.to_owned(),
            first_name: user.first_name.to_owned(),
            last_name: user.last_name.to_owned(),
            role: user.role.to_str().to_string(),
            department: user.department.clone(),
            phone: user.phone.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    pub fn filter_users(users: &[User]) -> Vec<Self> {
        users.iter().map(Self::filter_user).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub status: String,
    pub data: UserData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponseDto {
    pub status: String,
    pub users: Vec<FilterUserDto>,
    pub pagination: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> RegisterUserDto {
        RegisterUserDto {
            email: "jane.doe@example.com".to_string(),
            password: "Passw0rd".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            role: None,
            department: Some("Finance".to_string()),
            phone: Some("+1 555-123-4567".to_string()),
        }
    }

    #[test]
    fn accepts_a_valid_registration() {
        assert!(valid_register().validate().is_ok());
    }

    #[test]
    fn rejects_weak_passwords() {
        let mut dto = valid_register();
        dto.password = "alllowercase1".to_string();
        assert!(dto.validate().is_err());

        dto.password = "NODIGITSHERE".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn collects_every_violation_not_just_the_first() {
        let dto = RegisterUserDto {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            first_name: "J".to_string(),
            last_name: "D".to_string(),
            role: None,
            department: None,
            phone: None,
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("last_name"));
    }

    #[test]
    fn rejects_malformed_phone_numbers() {
        let mut dto = valid_register();
        dto.phone = Some("not a phone".to_string());
        assert!(dto.validate().is_err());
    }
}
