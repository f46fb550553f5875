use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use scorecard_core::{Notification, ReviewDecision};
use scorecard_workflow::{AssignmentView, MetricsSnapshot};

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    pub metrics: MetricsResponse,
}

/// Evidence workflow counters.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    #[schema(example = 42)]
    pub uploads_accepted: u64,
    #[schema(example = 3)]
    pub uploads_denied: u64,
    pub storage_failures: u64,
    pub persist_failures: u64,
    pub conflicts: u64,
    pub notifications_sent: u64,
    pub notification_failures: u64,
    pub reviews: u64,
}

impl From<MetricsSnapshot> for MetricsResponse {
    fn from(snap: MetricsSnapshot) -> Self {
        Self {
            uploads_accepted: snap.uploads_accepted,
            uploads_denied: snap.uploads_denied,
            storage_failures: snap.storage_failures,
            persist_failures: snap.persist_failures,
            conflicts: snap.conflicts,
            notifications_sent: snap.notifications_sent,
            notification_failures: snap.notification_failures,
            reviews: snap.reviews,
        }
    }
}

/// Multipart form accepted by `POST /api/upload`. Documentation only.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct UploadForm {
    /// The evidence document.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    #[schema(example = "asg-1")]
    pub assigned_indicator_id: String,
    #[schema(example = "Acta de reunión")]
    pub verification_method_name: String,
    #[schema(example = "ana")]
    pub user_id: String,
}

/// Query for `GET /v1/assignments`. Exactly one filter is required.
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListAssignmentsQuery {
    /// Assignments owned by this user.
    pub user_id: Option<String>,
    /// Assignments this user reviews.
    pub jury_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListAssignmentsResponse {
    pub assignments: Vec<AssignmentView>,
    pub count: usize,
}

/// Body of `POST /v1/assignments/{id}/methods/{name}/review`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    /// Juror making the decision.
    #[schema(example = "luis")]
    pub reviewer_id: String,
    pub decision: ReviewDecision,
    #[serde(default)]
    pub notes: Option<String>,
    /// New deadline, applied on `reset` only.
    #[serde(default)]
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListNotificationsQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListNotificationsResponse {
    pub notifications: Vec<Notification>,
    pub unread: usize,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "upload denied: deadline passed")]
    pub error: String,
    /// Machine-readable error category.
    #[schema(example = "deadline_passed")]
    pub kind: String,
}
