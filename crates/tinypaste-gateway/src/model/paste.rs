use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// JSON envelope shared by every `/pastes` response.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub message: T,
}

impl<T> ApiResponse<T> {
    pub fn new(status: StatusCode, message: T) -> Self {
        Self {
            status: status.as_u16(),
            message,
        }
    }

    pub fn ok(message: T) -> Self {
        Self::new(StatusCode::OK, message)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePasteRequest {
    pub text: String,
    #[serde(default)]
    pub secret: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListPastesQuery {
    pub page: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
