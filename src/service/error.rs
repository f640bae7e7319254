use thiserror::Error;
use uuid::Uuid;

use crate::error::{ErrorMessage, HttpError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Ticket {0} not found")]
    TicketNotFound(Uuid),

    #[error("User {0} not found")]
    UserNotFound(Uuid),

    #[error("{0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Notification error: {0}")]
    Notification(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::TicketNotFound(_) | ServiceError::UserNotFound(_) => {
                HttpError::not_found(error.to_string())
            }

            ServiceError::Forbidden(_) => HttpError::forbidden(error.to_string()),

            ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            // Store/transport details stay in the server logs.
            ServiceError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
            ServiceError::Notification(ref e) => {
                tracing::error!("Notification error: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn maps_to_http_status_codes() {
        let id = Uuid::new_v4();
        assert_eq!(
            HttpError::from(ServiceError::TicketNotFound(id)).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            HttpError::from(ServiceError::Forbidden("nope".to_string())).status,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            HttpError::from(ServiceError::Validation("bad".to_string())).status,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn database_errors_do_not_leak_details() {
        let err = ServiceError::Database(sqlx::Error::PoolTimedOut);
        let http: HttpError = err.into();
        assert_eq!(http.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!http.message.to_lowercase().contains("pool"));
    }
}
