use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bytes::Bytes;
use chrono::Utc;

use scorecard_core::{AssignmentId, EvidenceFile, UserId};
use scorecard_workflow::{UploadRequest, WorkflowError};

use crate::error::ServerError;

use super::AppState;
use super::schemas::{ErrorResponse, UploadForm};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Form fields collected from the multipart stream.
#[derive(Default)]
struct UploadFields {
    file: Option<(String, String, Bytes)>,
    assignment_id: Option<String>,
    method_name: Option<String>,
    user_id: Option<String>,
}

impl UploadFields {
    fn into_request(self) -> Result<UploadRequest, WorkflowError> {
        let missing = |field: &str| WorkflowError::Validation(format!("missing field: {field}"));
        let (original_name, content_type, data) = self.file.ok_or_else(|| missing("file"))?;
        Ok(UploadRequest {
            assignment_id: AssignmentId::new(
                self.assignment_id
                    .ok_or_else(|| missing("assignedIndicatorId"))?,
            ),
            method_name: self
                .method_name
                .ok_or_else(|| missing("verificationMethodName"))?,
            user_id: UserId::new(self.user_id.ok_or_else(|| missing("userId"))?),
            original_name,
            content_type,
            data,
        })
    }
}

fn multipart_error(e: MultipartError) -> ServerError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge(e.body_text())
    } else {
        ServerError::BadRequest(e.body_text())
    }
}

/// `POST /api/upload` -- attach an evidence file to a verification method.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "Evidence",
    summary = "Upload evidence",
    description = "Stores the file and marks the verification method as submitted. The assignment's jury is notified when the assignment becomes submitted.",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Evidence stored", body = EvidenceFile),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 403, description = "Deadline passed, method not open, or caller is not the owner", body = ErrorResponse),
        (status = 404, description = "Unknown user, assignment or method", body = ErrorResponse),
        (status = 409, description = "Assignment modified concurrently", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServerError> {
    let mut fields = UploadFields::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            "file" => {
                let original_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_owned();
                let data = field.bytes().await.map_err(multipart_error)?;
                fields.file = Some((original_name, content_type, data));
            }
            "assignedIndicatorId" => {
                fields.assignment_id = Some(field.text().await.map_err(multipart_error)?);
            }
            "verificationMethodName" => {
                fields.method_name = Some(field.text().await.map_err(multipart_error)?);
            }
            "userId" => {
                fields.user_id = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let request = fields.into_request()?;
    let outcome = state.service.upload(request, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(outcome.file)))
}
