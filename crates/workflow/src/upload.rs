//! Evidence upload: validate, gate, store the blob, then persist the
//! assignment and notify the jury.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use scorecard_blob::BlobTarget;
use scorecard_core::{
    Assignment, AssignmentId, EvidenceFile, Notice, UploadDenied, UserId, apply_upload,
    check_upload, evidence_url, sanitize_segment,
};
use scorecard_state::typed::Versioned;

use crate::error::WorkflowError;
use crate::service::EvidenceService;

/// One file submitted as evidence for a verification method.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub assignment_id: AssignmentId,
    pub method_name: String,
    /// The uploading user; must own the assignment.
    pub user_id: UserId,
    pub original_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl UploadRequest {
    fn validate(&self) -> Result<(), WorkflowError> {
        let required = [
            ("assignedIndicatorId", self.assignment_id.as_str()),
            ("verificationMethodName", self.method_name.as_str()),
            ("userId", self.user_id.as_str()),
            ("file name", self.original_name.as_str()),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(WorkflowError::Validation(format!("{field} is required")));
        }
        if self.data.is_empty() {
            return Err(WorkflowError::Validation("file is empty".to_owned()));
        }
        Ok(())
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub file: EvidenceFile,
    /// The assignment as persisted.
    pub assignment: Assignment,
    /// `SHA-256` hex digest of the stored content.
    pub checksum_sha256: String,
    /// Whether the jury was notified by this upload.
    pub jury_notified: bool,
}

impl EvidenceService {
    /// Attach an uploaded file to a verification method.
    ///
    /// Nothing is written when validation, ownership or the upload gate
    /// fails. The blob is written before the assignment; if the assignment
    /// write then fails the blob is left orphaned and its path is logged.
    #[instrument(
        skip_all,
        fields(
            assignment_id = %request.assignment_id,
            method = %request.method_name,
            user_id = %request.user_id,
        )
    )]
    pub async fn upload(
        &self,
        request: UploadRequest,
        now: DateTime<Utc>,
    ) -> Result<UploadOutcome, WorkflowError> {
        let result = self.upload_inner(request, now).await;
        match &result {
            Ok(_) => self.metrics.increment_uploads_accepted(),
            Err(WorkflowError::Storage(_)) => self.metrics.increment_storage_failures(),
            Err(
                WorkflowError::Validation(_)
                | WorkflowError::TooLarge { .. }
                | WorkflowError::NotFound { .. }
                | WorkflowError::PolicyDenied(_),
            ) => self.metrics.increment_uploads_denied(),
            Err(_) => {}
        }
        if let Err(e) = &result {
            info!(error = %e, kind = e.kind(), "upload rejected");
        }
        result
    }

    async fn upload_inner(
        &self,
        request: UploadRequest,
        now: DateTime<Utc>,
    ) -> Result<UploadOutcome, WorkflowError> {
        request.validate()?;
        self.policy
            .check(request.data.len() as u64, &request.content_type)?;

        let UploadRequest {
            assignment_id,
            method_name,
            user_id,
            original_name,
            content_type,
            data,
        } = request;

        let user = self.load_user(&user_id).await?;
        let Versioned {
            value: assignment,
            revision,
        } = self.load_assignment(&assignment_id).await?;

        if assignment.user_id != user.id {
            return Err(UploadDenied::NotOwner(user.id.to_string()).into());
        }
        check_upload(&assignment.assigned_verification_methods, &method_name, now)?;

        let target = BlobTarget {
            owner_name: &user.name,
            assignment_id: assignment.id.as_str(),
            method_name: &method_name,
            original_name: &original_name,
        };
        let stored = self.blobs.save(data, &target).await.inspect_err(|e| {
            error!(error = %e, "failed to store evidence blob");
        })?;

        let file = EvidenceFile {
            name: sanitize_segment(&original_name),
            original_name,
            file_name: stored.file_name.clone(),
            url: evidence_url(&stored.relative_path),
            uploaded_at: now.date_naive(),
            size: stored.size,
            content_type,
        };

        let mut updated = assignment;
        let transition = apply_upload(&mut updated, &method_name, file.clone(), now)?;

        if let Err(e) = self.persist_methods(&updated, revision).await {
            if matches!(e, WorkflowError::Conflict(_)) {
                warn!(
                    orphaned_blob = %stored.relative_path,
                    "assignment changed during upload, stored blob is orphaned"
                );
            } else {
                error!(
                    error = %e,
                    orphaned_blob = %stored.relative_path,
                    "failed to persist upload, stored blob is orphaned"
                );
            }
            return Err(e);
        }

        info!(
            file_name = %file.file_name,
            size = file.size,
            overall_status = updated.overall_status.as_str(),
            "evidence uploaded"
        );

        let jury_notified = if transition.entered_submitted() {
            self.announce(
                &updated.jury,
                Notice::submitted(updated.id.clone(), user.name.clone()),
            )
            .await
        } else {
            false
        };

        Ok(UploadOutcome {
            file,
            assignment: updated,
            checksum_sha256: stored.checksum_sha256,
            jury_notified,
        })
    }
}
