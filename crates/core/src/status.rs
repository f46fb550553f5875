//! Verification statuses and the assignment status aggregation rule.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::VerificationMethod;

/// Status of a single verification method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum MethodStatus {
    /// Waiting for evidence.
    Pending,
    /// Evidence uploaded, awaiting jury review.
    Submitted,
    /// Evidence accepted by the jury.
    Approved,
    /// Evidence rejected by the jury.
    Rejected,
    /// Deadline passed without evidence.
    Overdue,
}

impl MethodStatus {
    /// Return the wire name of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Overdue => "overdue",
        }
    }

    /// Whether the jury has reached a decision on this method.
    #[must_use]
    pub fn is_finalized(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Whether the method currently accepts a new evidence file.
    #[must_use]
    pub fn accepts_uploads(self) -> bool {
        matches!(self, Self::Pending | Self::Overdue)
    }
}

impl fmt::Display for MethodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate status of an assignment, derived from its methods.
///
/// Has no `Overdue` variant; overdue is a per-method display status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum OverallStatus {
    #[default]
    Pending,
    Submitted,
    Approved,
    Rejected,
}

impl OverallStatus {
    /// Return the wire name of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute an assignment's overall status from its verification methods.
///
/// Precedence: empty is `Pending`; any `Rejected` wins; unanimous `Approved`
/// is `Approved`; any `Submitted` is `Submitted`; everything else is
/// `Pending`.
#[must_use]
pub fn compute_overall_status(methods: &[VerificationMethod]) -> OverallStatus {
    if methods.is_empty() {
        return OverallStatus::Pending;
    }
    if methods.iter().any(|m| m.status == MethodStatus::Rejected) {
        return OverallStatus::Rejected;
    }
    if methods.iter().all(|m| m.status == MethodStatus::Approved) {
        return OverallStatus::Approved;
    }
    if methods.iter().any(|m| m.status == MethodStatus::Submitted) {
        return OverallStatus::Submitted;
    }
    OverallStatus::Pending
}

/// Status to display for a method at `now`.
///
/// A `Pending` method past its due date reads as `Overdue`. The stored
/// status is never changed by this function.
#[must_use]
pub fn effective_status(method: &VerificationMethod, now: DateTime<Utc>) -> MethodStatus {
    match (method.status, method.due_date) {
        (MethodStatus::Pending, Some(due)) if now > due => MethodStatus::Overdue,
        (status, _) => status,
    }
}
