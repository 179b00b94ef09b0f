use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The location token is neither coordinates nor a geocodable place
    #[error("Could not determine location: {0}")]
    Resolution(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal database error")
            }
            AppError::Resolution(ref e) => {
                tracing::info!("Location resolution failed: {}", e);
                (StatusCode::UNPROCESSABLE_ENTITY, "could not determine location")
            }
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.as_str()),
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
