//! File delivery endpoints: download, inline serve, download counting.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use notehub_common::AppResult;
use serde::Serialize;

use crate::middleware::AppState;

/// Increment-download response.
#[derive(Serialize)]
pub struct IncrementDownloadResponse {
    pub downloads: i64,
    pub success: bool,
}

/// Stream a note's file as an attachment.
///
/// Does not touch the download counter; the counter only moves through
/// the increment endpoint.
async fn download(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let payload = state.media_service.download(&id).await?;

    let disposition = format!("attachment; filename=\"{}\"", payload.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        payload.data,
    )
        .into_response())
}

/// Serve a note's file for in-browser viewing.
///
/// Content type follows the file extension; types the browser renders
/// natively are sent inline, the rest as attachments. Responses are
/// cacheable for an hour and readable cross-origin.
async fn serve(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let served = state.media_service.serve(&id).await?;

    let disposition = if served.inline {
        format!("inline; filename=\"{}\"", served.file_name)
    } else {
        format!("attachment; filename=\"{}\"", served.file_name)
    };

    Ok((
        [
            (header::CONTENT_TYPE, served.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
            (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
        ],
        served.data,
    )
        .into_response())
}

/// Add exactly one to the download counter.
async fn increment_download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<IncrementDownloadResponse>> {
    let downloads = state.note_service.increment_downloads(&id).await?;

    Ok(Json(IncrementDownloadResponse {
        downloads,
        success: true,
    }))
}

/// Create the file delivery router, nested under `/notes`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/download", get(download))
        .route("/{id}/file", get(serve))
        .route("/{id}/serve", get(serve))
        .route("/{id}/increment-download", post(increment_download))
}
