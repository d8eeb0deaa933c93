use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::backend_client::BackendError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing prerequisite: {0}")]
    MissingPrerequisite(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Load superseded by a newer request")]
    StaleLoad,

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Render error: {0}")]
    Render(#[from] minijinja::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::MissingPrerequisite(msg) => {
                (StatusCode::CONFLICT, "MISSING_PREREQUISITE", msg.clone())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::StaleLoad => (
                StatusCode::CONFLICT,
                "STALE_LOAD",
                "A newer load replaced this one".to_string(),
            ),
            AppError::Backend(e) => {
                tracing::error!("Backend error: {e}");
                let message = match e {
                    BackendError::Api { message, .. } => message.clone(),
                    _ => "The resume-analysis service could not be reached".to_string(),
                };
                (StatusCode::BAD_GATEWAY, "BACKEND_ERROR", message)
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "A page fragment could not be rendered".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_prerequisite_is_conflict() {
        let (status, code, message) =
            AppError::MissingPrerequisite("run an analysis first".to_string()).parts();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "MISSING_PREREQUISITE");
        assert_eq!(message, "run an analysis first");
    }

    #[test]
    fn test_backend_api_error_passes_detail_through() {
        let err = AppError::Backend(BackendError::Api {
            status: 404,
            message: "Candidate not found".to_string(),
        });
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "BACKEND_ERROR");
        assert_eq!(message, "Candidate not found");
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let err = AppError::Internal(anyhow::anyhow!("secret connection string"));
        let (status, _, message) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!message.contains("secret"));
    }
}
