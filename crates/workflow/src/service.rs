use std::collections::BTreeSet;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, warn};

use scorecard_blob::BlobStore;
use scorecard_core::{
    Assignment, AssignmentId, Notice, OverallStatus, User, UserId, VerificationMethod,
    is_safe_relative_path,
};
use scorecard_notify::NotificationDispatcher;
use scorecard_state::typed::{self, Versioned};
use scorecard_state::{CasResult, Collection, DocumentStore};

use crate::builder::EvidenceServiceBuilder;
use crate::error::WorkflowError;
use crate::metrics::WorkflowMetrics;
use crate::policy::UploadPolicy;

/// Orchestrates evidence uploads, jury reviews and the records they touch.
///
/// Construct one with [`EvidenceService::builder`].
pub struct EvidenceService {
    pub(crate) store: Arc<dyn DocumentStore>,
    pub(crate) blobs: Arc<dyn BlobStore>,
    pub(crate) dispatcher: Arc<dyn NotificationDispatcher>,
    pub(crate) policy: UploadPolicy,
    pub(crate) metrics: Arc<WorkflowMetrics>,
}

/// The only fields an upload or review rewrites on an assignment.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MethodsUpdate<'a> {
    assigned_verification_methods: &'a [VerificationMethod],
    overall_status: OverallStatus,
}

impl EvidenceService {
    pub fn builder() -> EvidenceServiceBuilder {
        EvidenceServiceBuilder::new()
    }

    pub fn metrics(&self) -> &Arc<WorkflowMetrics> {
        &self.metrics
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Read a stored evidence blob by its path relative to the store root.
    pub async fn read_evidence(&self, relative_path: &str) -> Result<Bytes, WorkflowError> {
        if !is_safe_relative_path(relative_path) {
            return Err(WorkflowError::Validation(format!(
                "invalid file path: {relative_path}"
            )));
        }
        self.blobs
            .read(relative_path)
            .await?
            .ok_or_else(|| WorkflowError::not_found("file", relative_path))
    }

    pub(crate) async fn load_user(&self, id: &UserId) -> Result<User, WorkflowError> {
        typed::get::<User>(self.store.as_ref(), &Collection::Users, id.as_str())
            .await?
            .map(|v| v.value)
            .ok_or_else(|| WorkflowError::not_found("user", id.as_str()))
    }

    pub(crate) async fn load_assignment(
        &self,
        id: &AssignmentId,
    ) -> Result<Versioned<Assignment>, WorkflowError> {
        typed::get::<Assignment>(self.store.as_ref(), &Collection::Assignments, id.as_str())
            .await?
            .ok_or_else(|| WorkflowError::not_found("assignment", id.as_str()))
    }

    /// Write back the methods and overall status of `assignment` in a single
    /// update, provided nobody changed it since `expected_revision`.
    pub(crate) async fn persist_methods(
        &self,
        assignment: &Assignment,
        expected_revision: u64,
    ) -> Result<u64, WorkflowError> {
        let update = MethodsUpdate {
            assigned_verification_methods: &assignment.assigned_verification_methods,
            overall_status: assignment.overall_status,
        };
        let result = typed::replace_if(
            self.store.as_ref(),
            &Collection::Assignments,
            assignment.id.as_str(),
            expected_revision,
            &update,
        )
        .await;

        match result {
            Ok(CasResult::Ok { revision }) => Ok(revision),
            Ok(CasResult::Conflict { current_revision }) => {
                self.metrics.increment_conflicts();
                debug!(
                    expected_revision,
                    current_revision, "assignment revision moved during write"
                );
                Err(WorkflowError::Conflict(assignment.id.to_string()))
            }
            Err(source) => {
                self.metrics.increment_persist_failures();
                Err(WorkflowError::Persist {
                    id: assignment.id.to_string(),
                    source,
                })
            }
        }
    }

    /// Hand `notice` to the dispatcher. Failures are logged and counted,
    /// never returned. Returns whether delivery succeeded.
    pub(crate) async fn announce(&self, recipients: &BTreeSet<UserId>, notice: Notice) -> bool {
        match self.dispatcher.notify(recipients, &notice).await {
            Ok(()) => {
                self.metrics.increment_notifications_sent();
                true
            }
            Err(e) => {
                self.metrics.increment_notification_failures();
                warn!(
                    error = %e,
                    kind = ?notice.kind,
                    assignment_id = %notice.assignment_id,
                    recipients = recipients.len(),
                    "notification delivery failed"
                );
                false
            }
        }
    }
}
