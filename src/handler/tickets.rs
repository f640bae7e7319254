use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::notificationdb::NotificationExt,
    dtos::{
        ticketdtos::{
            AssignTicketDto, CommentDto, CreateTicketDto, TicketListData, TicketListResponseDto,
            TicketQueryDto, UpdateTicketDto,
        },
        Pagination, Response,
    },
    error::{ErrorMessage, HttpError},
    middleware::JWTAuthMiddeware,
    models::usermodel::UserRole,
    AppState,
};

pub fn tickets_handler() -> Router {
    Router::new()
        .route("/", post(create_ticket).get(get_tickets))
        .route("/stats/overview", get(get_ticket_stats))
        .route(
            "/:ticket_id",
            get(get_ticket).put(update_ticket).delete(delete_ticket),
        )
        .route("/:ticket_id/comments", post(add_comment))
        .route("/:ticket_id/assign", post(assign_ticket))
        .route("/:ticket_id/notifications", get(get_ticket_notifications))
}

pub async fn create_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateTicketDto>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .ticket_service
        .create_ticket(&user.user, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "data": { "ticket": ticket },
        })),
    ))
}

pub async fn get_tickets(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Query(query_params): Query<TicketQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(10);

    let (tickets, total_count) = app_state
        .ticket_service
        .list_tickets(&user.user, &query_params, page, limit)
        .await?;

    Ok(Json(TicketListResponseDto {
        status: "success".to_string(),
        data: TicketListData {
            tickets,
            pagination: Pagination::new(page, limit, total_count),
        },
    }))
}

pub async fn get_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(ticket_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let (ticket, updates) = app_state
        .ticket_service
        .get_ticket(&user.user, ticket_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "ticket": ticket, "updates": updates },
    })))
}

pub async fn update_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<UpdateTicketDto>,
) -> Result<impl IntoResponse, HttpError> {
    // Authorization and validation both live in the service, in that order.
    let ticket = app_state
        .ticket_service
        .update_ticket(&user.user, ticket_id, body)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "ticket": ticket },
    })))
}

pub async fn assign_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<AssignTicketDto>,
) -> Result<impl IntoResponse, HttpError> {
    let ticket = app_state
        .ticket_service
        .assign_ticket(&user.user, ticket_id, body.assigned_to)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "ticket": ticket },
    })))
}

pub async fn add_comment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(ticket_id): Path<Uuid>,
    Json(body): Json<CommentDto>,
) -> Result<impl IntoResponse, HttpError> {
    let update = app_state
        .ticket_service
        .add_comment(&user.user, ticket_id, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "data": { "update": update },
        })),
    ))
}

pub async fn delete_ticket(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(ticket_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .ticket_service
        .delete_ticket(&user.user, ticket_id)
        .await?;

    Ok(Json(Response {
        status: "success",
        message: "Ticket deleted successfully".to_string(),
    }))
}

/// Delivery log for a ticket's emails, for admin troubleshooting.
pub async fn get_ticket_notifications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(ticket_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    if user.user.role != UserRole::ItAdmin {
        return Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ));
    }

    let notifications = app_state
        .db_client
        .get_ticket_notifications(ticket_id)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "notifications": notifications },
    })))
}

pub async fn get_ticket_stats(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let stats = app_state.ticket_service.get_stats(&user.user).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "stats": stats },
    })))
}
