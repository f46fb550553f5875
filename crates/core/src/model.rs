use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::status::{MethodStatus, OverallStatus, compute_overall_status};
use crate::types::{AssignmentId, IndicatorId, UserId};

/// An uploaded evidence document. Never mutated once created, only
/// superseded by a newer upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EvidenceFile {
    /// Display name (sanitized original filename).
    pub name: String,
    /// Filename as declared by the uploader.
    pub original_name: String,
    /// Unique name generated by the blob store.
    pub file_name: String,
    /// Resolvable path, always `/api/files/{relativePath}`.
    pub url: String,
    /// Upload day.
    pub uploaded_at: NaiveDate,
    /// Size in bytes.
    pub size: u64,
    /// Declared MIME type.
    #[serde(rename = "type")]
    pub content_type: String,
}

/// One piece of evidence required by an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VerificationMethod {
    /// Unique within the parent assignment.
    pub name: String,
    pub status: MethodStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_file: Option<EvidenceFile>,
    /// Superseded files, oldest first.
    #[serde(default)]
    pub file_history: Vec<EvidenceFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl VerificationMethod {
    /// A fresh `Pending` method with no files.
    #[must_use]
    pub fn new(name: impl Into<String>, due_date: Option<DateTime<Utc>>) -> Self {
        Self {
            name: name.into(),
            status: MethodStatus::Pending,
            due_date,
            submitted_file: None,
            file_history: Vec::new(),
            notes: None,
        }
    }

    /// Attach `file` as the current evidence, archiving the previous one.
    pub(crate) fn attach(&mut self, file: EvidenceFile) {
        if let Some(previous) = self.submitted_file.replace(file) {
            self.file_history.push(previous);
        }
        self.status = MethodStatus::Submitted;
    }
}

/// An indicator assigned to a responsible user (`AssignedIndicator`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Assignment {
    pub id: AssignmentId,
    /// The responsible party, the only user allowed to upload.
    pub user_id: UserId,
    pub indicator_id: IndicatorId,
    /// Reviewers (calificadores).
    #[serde(default)]
    pub jury: BTreeSet<UserId>,
    #[serde(default)]
    pub assigned_verification_methods: Vec<VerificationMethod>,
    /// Cached aggregate; see [`compute_overall_status`].
    #[serde(default)]
    pub overall_status: OverallStatus,
}

impl Assignment {
    /// Look up a method by name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&VerificationMethod> {
        self.assigned_verification_methods
            .iter()
            .find(|m| m.name == name)
    }

    pub(crate) fn method_mut(&mut self, name: &str) -> Option<&mut VerificationMethod> {
        self.assigned_verification_methods
            .iter_mut()
            .find(|m| m.name == name)
    }

    /// Recompute and store the overall status. Returns the new value.
    pub fn refresh_overall_status(&mut self) -> OverallStatus {
        self.overall_status = compute_overall_status(&self.assigned_verification_methods);
        self.overall_status
    }

    /// Whether `user` sits on this assignment's jury.
    #[must_use]
    pub fn is_juror(&self, user: &UserId) -> bool {
        self.jury.contains(user)
    }
}

/// Role of a user within the scorecard application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Role {
    Admin,
    /// Creates assignments.
    Asignador,
    /// Owns assignments and uploads evidence.
    Responsable,
    /// Jury member reviewing evidence.
    Calificador,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    pub id: UserId,
    /// Display name, also used as the owner folder for stored evidence.
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
}
