use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tinypaste_core::PasteError;
use tracing::error;

use crate::model::ApiResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Paste(#[from] PasteError),
    #[error("API limit reached")]
    RateLimited,
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Paste(PasteError::InvalidIdentifier(rejection.body_text()))
    }
}

impl AppError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "API limit reached".to_string(),
            ),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            // Malformed and unknown ids look the same from outside.
            AppError::Paste(e) if e.is_not_found() => {
                (StatusCode::NOT_FOUND, "Not Found".to_string())
            }
            AppError::Paste(PasteError::Validation(message)) => (StatusCode::BAD_REQUEST, message),
            AppError::Paste(e) => {
                error!(error = %e, "paste request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ApiResponse::new(status, message))).into_response()
    }
}
