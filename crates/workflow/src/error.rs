use thiserror::Error;

use scorecard_blob::BlobError;
use scorecard_core::{ReviewDenied, UploadDenied};
use scorecard_state::StateError;

/// Errors surfaced by [`EvidenceService`](crate::EvidenceService) operations.
///
/// Notification failures are never returned; they are logged.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Missing or malformed input.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The uploaded file exceeds the configured size limit.
    #[error("file too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge {
        /// Actual size.
        size: u64,
        /// Maximum allowed size.
        limit: u64,
    },

    /// A referenced user, assignment or file does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The upload gate refused the file.
    #[error("upload denied: {0}")]
    PolicyDenied(#[from] UploadDenied),

    /// The review was refused.
    #[error("review denied: {0}")]
    ReviewDenied(#[from] ReviewDenied),

    /// A record with this id already exists.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Writing or reading an evidence blob failed.
    #[error("storage failure: {0}")]
    Storage(#[from] BlobError),

    /// The assignment write failed after the blob was stored.
    #[error("failed to persist {id}: {source}")]
    Persist {
        id: String,
        #[source]
        source: StateError,
    },

    /// The assignment changed between read and write.
    #[error("assignment {0} was modified concurrently, retry the operation")]
    Conflict(String),

    /// A read from the document store failed.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// The service was misconfigured (e.g. missing required components).
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl WorkflowError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Stable machine-readable name of the error category.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::TooLarge { .. } => "too_large",
            Self::NotFound { .. } | Self::PolicyDenied(UploadDenied::MethodNotFound(_)) => {
                "not_found"
            }
            Self::PolicyDenied(UploadDenied::DeadlinePassed { .. }) => "deadline_passed",
            Self::PolicyDenied(UploadDenied::InvalidState(_)) => "invalid_state",
            Self::PolicyDenied(UploadDenied::NotOwner(_)) => "not_owner",
            Self::ReviewDenied(ReviewDenied::MethodNotFound(_)) => "not_found",
            Self::ReviewDenied(ReviewDenied::DeadlineRequired { .. }) => "deadline_required",
            Self::ReviewDenied(_) => "review_denied",
            Self::AlreadyExists(_) => "already_exists",
            Self::Storage(_) => "storage_failure",
            Self::Persist { .. } => "persist_failure",
            Self::Conflict(_) => "conflict",
            Self::State(_) => "state_failure",
            Self::Configuration(_) => "configuration",
        }
    }
}
