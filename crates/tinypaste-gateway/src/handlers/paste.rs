use crate::error::{AppError, Result};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::model::{ApiResponse, CreatePasteRequest, ListPastesQuery};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tinypaste_core::CreatePaste;
use tracing::info;

pub async fn create_paste_handler(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreatePasteRequest>,
) -> Result<Json<ApiResponse<String>>> {
    let paste_id = state
        .pastebin()
        .create(CreatePaste {
            text: request.text,
            secret: request.secret,
        })
        .await?;

    info!(secret = paste_id.is_secret(), "paste created");
    Ok(Json(ApiResponse::ok(paste_id.to_string())))
}

pub async fn get_paste_handler(
    AppPath(paste_id): AppPath<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>> {
    let record = state.pastebin().read(&paste_id).await?;
    Ok(Json(ApiResponse::ok(record.text)))
}

pub async fn list_pastes_handler(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListPastesQuery>,
) -> Result<Json<ApiResponse<Vec<String>>>> {
    let ids = state.pastebin().list(query.page.unwrap_or(1)).await?;
    Ok(Json(ApiResponse::ok(
        ids.iter().map(ToString::to_string).collect(),
    )))
}

/// Serves the paste body as plain text, outside the JSON envelope.
pub async fn raw_paste_handler(
    Path(paste_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    match state.pastebin().read(&paste_id).await {
        Ok(record) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            record.text,
        )
            .into_response(),
        Err(e) if e.is_not_found() => (StatusCode::NOT_FOUND, "404 Not found").into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}
