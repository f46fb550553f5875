use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::MethodStatus;
use crate::types::{AssignmentId, NotificationId, UserId};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum NoticeKind {
    /// Evidence was submitted and awaits the jury.
    EvidenceSubmitted,
    /// A juror decided on a verification method.
    MethodReviewed,
}

/// The event being announced, independent of who receives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Notice {
    pub kind: NoticeKind,
    pub assignment_id: AssignmentId,
    /// Display name of the user who caused the event.
    pub actor_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_status: Option<MethodStatus>,
}

impl Notice {
    /// Evidence for `assignment_id` submitted by `actor_name`.
    #[must_use]
    pub fn submitted(assignment_id: AssignmentId, actor_name: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::EvidenceSubmitted,
            assignment_id,
            actor_name: actor_name.into(),
            method_name: None,
            method_status: None,
        }
    }

    /// `actor_name` moved `method_name` to `status`.
    #[must_use]
    pub fn reviewed(
        assignment_id: AssignmentId,
        actor_name: impl Into<String>,
        method_name: impl Into<String>,
        status: MethodStatus,
    ) -> Self {
        Self {
            kind: NoticeKind::MethodReviewed,
            assignment_id,
            actor_name: actor_name.into(),
            method_name: Some(method_name.into()),
            method_status: Some(status),
        }
    }

    /// Human-readable message for list views.
    #[must_use]
    pub fn message(&self) -> String {
        match (self.kind, &self.method_name, self.method_status) {
            (NoticeKind::EvidenceSubmitted, _, _) => format!(
                "{} submitted evidence for assignment {}",
                self.actor_name, self.assignment_id
            ),
            (NoticeKind::MethodReviewed, Some(method), Some(status)) => format!(
                "{} marked \"{method}\" as {status} on assignment {}",
                self.actor_name, self.assignment_id
            ),
            (NoticeKind::MethodReviewed, _, _) => format!(
                "{} reviewed assignment {}",
                self.actor_name, self.assignment_id
            ),
        }
    }
}

/// A notification addressed to a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    #[serde(flatten)]
    pub notice: Notice,
    pub message: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}
