use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use scorecard_core::{ReviewDenied, UploadDenied};
use scorecard_state::StateError;
use scorecard_workflow::WorkflowError;

/// Errors that can occur when running the scorecard server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A workflow error surfaced through the API.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// A document store error outside the workflow service.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// Malformed request the handler rejected before reaching the service.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The request body exceeded the configured upload limit.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
}

impl ServerError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "configuration"),
            Self::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io"),
            Self::State(_) => (StatusCode::INTERNAL_SERVER_ERROR, "state_failure"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "validation"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "too_large"),
            Self::Workflow(e) => (workflow_status(e), e.kind()),
        }
    }
}

fn workflow_status(error: &WorkflowError) -> StatusCode {
    match error {
        WorkflowError::Validation(_) => StatusCode::BAD_REQUEST,
        WorkflowError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        WorkflowError::NotFound { .. }
        | WorkflowError::PolicyDenied(UploadDenied::MethodNotFound(_))
        | WorkflowError::ReviewDenied(ReviewDenied::MethodNotFound(_)) => StatusCode::NOT_FOUND,
        WorkflowError::PolicyDenied(_) | WorkflowError::ReviewDenied(_) => StatusCode::FORBIDDEN,
        WorkflowError::AlreadyExists(_) | WorkflowError::Conflict(_) => StatusCode::CONFLICT,
        WorkflowError::Storage(_)
        | WorkflowError::Persist { .. }
        | WorkflowError::State(_)
        | WorkflowError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status.is_server_error() {
            tracing::error!(error = %self, kind, "request failed");
        }
        let body = serde_json::json!({ "error": self.to_string(), "kind": kind });
        (status, axum::Json(body)).into_response()
    }
}
