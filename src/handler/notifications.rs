use std::sync::Arc;

use axum::{middleware, response::IntoResponse, routing::post, Extension, Json, Router};

use crate::{
    error::HttpError,
    middleware::role_check,
    models::usermodel::UserRole,
    AppState,
};

pub fn notifications_handler() -> Router {
    Router::new().route(
        "/retry-failed",
        post(retry_failed).layer(middleware::from_fn(|req, next| {
            role_check(req, next, vec![UserRole::ItAdmin])
        })),
    )
}

/// Moves failed notifications back to pending; the periodic sweep picks
/// them up on its next pass.
pub async fn retry_failed(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let requeued = app_state.notification_dispatcher.retry_failed().await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Failed notifications queued for retry",
        "requeued": requeued,
    })))
}
