#![allow(clippy::needless_for_each)]

use scorecard_core::{
    Assignment, EvidenceFile, MethodStatus, Notice, NoticeKind, Notification, OverallStatus,
    ReviewDecision, Role, User, VerificationMethod,
};
use scorecard_workflow::{AssignmentView, NewAssignment, NewMethod, ReviewOutcome};

use super::schemas::{
    ErrorResponse, HealthResponse, ListAssignmentsResponse, ListNotificationsResponse,
    MetricsResponse, ReviewRequest, UploadForm,
};

#[derive(utoipa::OpenApi)]
#[openapi(
    info(
        title = "Scorecard Evidence API",
        version = "0.1.0",
        description = "Upload and review evidence for assigned scorecard indicators.",
        license(name = "Apache-2.0")
    ),
    tags(
        (name = "Health", description = "Service health and metrics"),
        (name = "Evidence", description = "Evidence upload and download"),
        (name = "Users", description = "User registry"),
        (name = "Assignments", description = "Assigned indicators, verification methods and jury review"),
        (name = "Notifications", description = "Per-user notification inbox")
    ),
    paths(
        super::health::health,
        super::upload::upload,
        super::files::download,
        super::users::create_user,
        super::users::get_user,
        super::assignments::create_assignment,
        super::assignments::get_assignment,
        super::assignments::list_assignments,
        super::assignments::review_method,
        super::notifications::list_notifications,
        super::notifications::mark_read,
    ),
    components(schemas(
        HealthResponse, MetricsResponse, ErrorResponse, UploadForm,
        EvidenceFile, VerificationMethod, Assignment, MethodStatus, OverallStatus,
        User, Role,
        NewAssignment, NewMethod, AssignmentView, ListAssignmentsResponse,
        ReviewRequest, ReviewDecision, ReviewOutcome,
        Notice, NoticeKind, Notification, ListNotificationsResponse,
    ))
)]
pub struct ApiDoc;
