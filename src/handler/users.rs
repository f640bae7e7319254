use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::userdb::UserExt,
    dtos::{
        userdtos::{
            FilterUserDto, RegisterUserDto, UpdateUserDto, UserData, UserListResponseDto,
            UserQueryDto, UserResponseDto,
        },
        Pagination, Response,
    },
    error::{ErrorMessage, HttpError},
    middleware::JWTAuthMiddeware,
    models::usermodel::{User, UserRole},
    service::policy,
    utils::password,
    AppState,
};

/// Listing and lookup are open to IT staff; every mutation is admin
/// only. The same path carries different role sets per method, so the
/// checks live in the handlers rather than route layers.
pub fn users_handler() -> Router {
    Router::new()
        .route("/", get(get_users).post(create_user))
        .route("/it-users", get(get_it_users))
        .route("/:user_id", get(get_user).put(update_user).delete(delete_user))
        .route("/:user_id/activate", patch(activate_user))
        .route("/:user_id/deactivate", patch(deactivate_user))
}

fn require_it_staff(user: &User) -> Result<(), HttpError> {
    if user.role.is_it_staff() {
        Ok(())
    } else {
        Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ))
    }
}

fn require_admin(user: &User) -> Result<(), HttpError> {
    if policy::can_manage_users(user) {
        Ok(())
    } else {
        Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ))
    }
}

pub async fn get_users(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Query(query_params): Query<UserQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    require_it_staff(&user.user)?;

    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(10);

    let users = app_state
        .db_client
        .get_users(
            page,
            limit,
            query_params.role,
            query_params.department.as_deref(),
            query_params.search.as_deref(),
        )
        .await?;

    let total_count = app_state
        .db_client
        .get_user_count(
            query_params.role,
            query_params.department.as_deref(),
            query_params.search.as_deref(),
        )
        .await?;

    Ok(Json(UserListResponseDto {
        status: "success".to_string(),
        users: FilterUserDto::filter_users(&users),
        pagination: Pagination::new(page, limit, total_count),
    }))
}

/// Active IT staff, for the assignment picker.
pub async fn get_it_users(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    require_it_staff(&user.user)?;

    let users = app_state
        .db_client
        .get_it_users()
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "users": FilterUserDto::filter_users(&users),
    })))
}

pub async fn get_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    require_it_staff(&user.user)?;

    let target = app_state
        .db_client
        .get_user(Some(user_id), None)
        .await?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&target),
        },
    }))
}

pub async fn create_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    require_admin(&user.user)?;

    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let existing_user = app_state
        .db_client
        .get_user(None, Some(&body.email))
        .await?;

    if existing_user.is_some() {
        return Err(HttpError::conflict(ErrorMessage::EmailExist.to_string()));
    }

    let hashed_password =
        password::hash(&body.password).map_err(|e| HttpError::server_error(e.to_string()))?;

    let created = app_state
        .db_client
        .save_user(
            body.email,
            hashed_password,
            body.first_name,
            body.last_name,
            body.role.unwrap_or(UserRole::EndUser),
            body.department,
            body.phone,
        )
        .await?;

    let response = UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&created),
        },
    };

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    require_admin(&user.user)?;

    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    app_state
        .db_client
        .get_user(Some(user_id), None)
        .await?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    let updated = app_state
        .db_client
        .update_user(user_id, body)
        .await?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&updated),
        },
    }))
}

pub async fn activate_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    require_admin(&user.user)?;

    set_active(app_state, user_id, true, "User activated successfully").await
}

pub async fn deactivate_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    require_admin(&user.user)?;

    if !policy::can_modify_account(&user.user, user_id) {
        return Err(HttpError::bad_request(
            "Cannot deactivate your own account".to_string(),
        ));
    }

    set_active(app_state, user_id, false, "User deactivated successfully").await
}

async fn set_active(
    app_state: Arc<AppState>,
    user_id: Uuid,
    is_active: bool,
    message: &str,
) -> Result<Json<Response>, HttpError> {
    app_state
        .db_client
        .get_user(Some(user_id), None)
        .await?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    app_state
        .db_client
        .set_user_active(user_id, is_active)
        .await?;

    Ok(Json(Response {
        status: "success",
        message: message.to_string(),
    }))
}

pub async fn delete_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    require_admin(&user.user)?;

    if !policy::can_modify_account(&user.user, user_id) {
        return Err(HttpError::bad_request(
            "Cannot delete your own account".to_string(),
        ));
    }

    let deleted = app_state
        .db_client
        .delete_user(user_id)
        .await?;

    if deleted == 0 {
        return Err(HttpError::not_found("User not found"));
    }

    Ok(Json(Response {
        status: "success",
        message: "User deleted successfully".to_string(),
    }))
}
