//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server faults to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`, and every error body has the shape
//! `{"message": "..."}`.
//!
//! # Status codes
//!
//! | Error | Status |
//! |---|---|
//! | `NotFound` | 404 |
//! | Constraint violations, values that do not fit their column | 400 |
//! | Database and reconciliation faults | 500 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::models::MessageResponse;
use crate::services::reconcile::ReconcileError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Product tag reconciliation failed.
    #[error("Reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Resource not found. The message is returned to the client as-is.
    #[error("{0}")]
    NotFound(String),
}

impl AppError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Reconcile(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Reconcile(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            _ if status.is_server_error() => "Internal server error".to_string(),
            Self::Database(RepositoryError::Constraint(constraint)) => {
                format!("Request violates constraint {constraint}")
            }
            Self::Database(RepositoryError::InvalidData(detail)) => {
                format!("Request contains an invalid value: {detail}")
            }
            Self::Reconcile(_) => "Request references a tag that does not exist".to_string(),
            Self::NotFound(msg) => msg.clone(),
            Self::Database(_) => self.to_string(),
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_message(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice::<MessageResponse>(&bytes)
            .unwrap()
            .message
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Category not found".to_string());
        assert_eq!(err.to_string(), "Category not found");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Database(
                sqlx::Error::PoolTimedOut
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Constraint(
                "product_price_check".to_string()
            ))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::InvalidData(
                "numeric field overflow".to_string()
            ))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_reconcile_status_depends_on_cause() {
        let client = AppError::Reconcile(ReconcileError::Insert(RepositoryError::Constraint(
            "product_tag_tag_id_fkey".to_string(),
        )));
        assert_eq!(client.status(), StatusCode::BAD_REQUEST);

        let server = AppError::Reconcile(ReconcileError::Delete(RepositoryError::Database(
            sqlx::Error::PoolTimedOut,
        )));
        assert_eq!(server.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_not_found_body_is_the_message() {
        let response = AppError::NotFound("Tag not found".to_string()).into_response();
        assert_eq!(body_message(response).await, "Tag not found");
    }

    #[tokio::test]
    async fn test_server_error_body_hides_details() {
        let response = AppError::Database(RepositoryError::DataCorruption(
            "product 7 missing after insert".to_string(),
        ))
        .into_response();
        assert_eq!(body_message(response).await, "Internal server error");
    }

    #[tokio::test]
    async fn test_invalid_data_body_names_the_problem() {
        let response = AppError::Database(RepositoryError::InvalidData(
            "value too long for type character varying(255)".to_string(),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_message(response).await,
            "Request contains an invalid value: value too long for type character varying(255)"
        );
    }
}
