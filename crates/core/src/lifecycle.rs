//! In-memory evidence lifecycle transitions on an [`Assignment`].

use chrono::{DateTime, Utc};

use crate::error::{ReviewDenied, UploadDenied};
use crate::gate::can_upload;
use crate::model::{Assignment, EvidenceFile};
use crate::status::{MethodStatus, OverallStatus};
use crate::types::UserId;

/// Overall status before and after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub previous: OverallStatus,
    pub current: OverallStatus,
}

impl StatusTransition {
    /// True when the assignment just became `Submitted`.
    #[must_use]
    pub fn entered_submitted(&self) -> bool {
        self.current == OverallStatus::Submitted && self.previous != OverallStatus::Submitted
    }

    #[must_use]
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

/// Attach `file` to the method named `method_name`.
///
/// The upload gate is re-checked here. On denial the assignment is left
/// untouched. On success the previous file (if any) is appended to the
/// method's history, the method becomes `Submitted` and the overall status
/// is recomputed.
pub fn apply_upload(
    assignment: &mut Assignment,
    method_name: &str,
    file: EvidenceFile,
    now: DateTime<Utc>,
) -> Result<StatusTransition, UploadDenied> {
    let previous = assignment.overall_status;
    let method = assignment
        .method_mut(method_name)
        .ok_or_else(|| UploadDenied::MethodNotFound(method_name.to_owned()))?;
    can_upload(method, now)?;
    method.attach(file);

    let current = assignment.refresh_overall_status();
    Ok(StatusTransition { previous, current })
}

/// A jury decision on one verification method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ReviewDecision {
    Approve,
    Reject,
    /// Re-open the method for a new upload.
    Reset,
}

/// A review request as submitted by a juror.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Review {
    pub decision: ReviewDecision,
    /// Replaces the method's notes when present.
    #[serde(default)]
    pub notes: Option<String>,
    /// New deadline, only honoured on `Reset`.
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl Review {
    #[must_use]
    pub fn new(decision: ReviewDecision) -> Self {
        Self {
            decision,
            notes: None,
            due_date: None,
        }
    }
}

/// Apply a jury review to the method named `method_name`.
///
/// Returns the method's new status together with the overall transition.
pub fn apply_review(
    assignment: &mut Assignment,
    method_name: &str,
    reviewer: &UserId,
    review: Review,
    now: DateTime<Utc>,
) -> Result<(MethodStatus, StatusTransition), ReviewDenied> {
    if !assignment.is_juror(reviewer) {
        return Err(ReviewDenied::NotJuror(reviewer.to_string()));
    }
    let previous = assignment.overall_status;
    let method = assignment
        .method_mut(method_name)
        .ok_or_else(|| ReviewDenied::MethodNotFound(method_name.to_owned()))?;

    let next = match review.decision {
        ReviewDecision::Approve | ReviewDecision::Reject
            if method.status != MethodStatus::Submitted =>
        {
            return Err(ReviewDenied::NotSubmitted(method.status));
        }
        ReviewDecision::Approve => MethodStatus::Approved,
        ReviewDecision::Reject => MethodStatus::Rejected,
        ReviewDecision::Reset if method.status.accepts_uploads() => {
            return Err(ReviewDenied::AlreadyOpen(method.status));
        }
        ReviewDecision::Reset => {
            let due_date = review.due_date.or(method.due_date);
            if let Some(due) = due_date
                && now > due
            {
                return Err(ReviewDenied::DeadlineRequired { due_date: due });
            }
            method.due_date = due_date;
            MethodStatus::Pending
        }
    };

    method.status = next;
    if review.notes.is_some() {
        method.notes = review.notes;
    }

    let current = assignment.refresh_overall_status();
    Ok((next, StatusTransition { previous, current }))
}
