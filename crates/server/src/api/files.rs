use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use scorecard_core::path::extension;

use crate::error::ServerError;

use super::AppState;
use super::schemas::ErrorResponse;

fn content_type_for(path: &str) -> &'static str {
    match extension(path).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// `GET /api/files/{path}` -- stream a stored evidence file.
#[utoipa::path(
    get,
    path = "/api/files/{path}",
    tag = "Evidence",
    summary = "Download evidence",
    params(
        ("path" = String, Path, description = "Owner folder and generated file name"),
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid path", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
    )
)]
pub async fn download(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, ServerError> {
    let data = state.service.read_evidence(&path).await?;
    Ok(([(header::CONTENT_TYPE, content_type_for(&path))], data).into_response())
}
