use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;

use scorecard_core::{AssignmentId, Review, UserId};
use scorecard_workflow::{AssignmentView, NewAssignment, ReviewOutcome};

use crate::error::ServerError;

use super::AppState;
use super::schemas::{
    ErrorResponse, ListAssignmentsQuery, ListAssignmentsResponse, ReviewRequest,
};

/// `POST /v1/assignments` -- assign an indicator to a responsible user.
#[utoipa::path(
    post,
    path = "/v1/assignments",
    tag = "Assignments",
    summary = "Create assignment",
    description = "Creates an assignment whose verification methods all start pending.",
    request_body = NewAssignment,
    responses(
        (status = 201, description = "Assignment created", body = AssignmentView),
        (status = 400, description = "Invalid method list", body = ErrorResponse),
        (status = 404, description = "Owner or juror not found", body = ErrorResponse),
        (status = 409, description = "Assignment id already taken", body = ErrorResponse),
    )
)]
pub async fn create_assignment(
    State(state): State<AppState>,
    Json(request): Json<NewAssignment>,
) -> Result<impl IntoResponse, ServerError> {
    let view = state.service.create_assignment(request, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /v1/assignments/{id}` -- assignment with display statuses.
#[utoipa::path(
    get,
    path = "/v1/assignments/{id}",
    tag = "Assignments",
    summary = "Get assignment",
    params(("id" = String, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment", body = AssignmentView),
        (status = 404, description = "Assignment not found", body = ErrorResponse),
    )
)]
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AssignmentView>, ServerError> {
    let view = state
        .service
        .assignment_view(&AssignmentId::new(id), Utc::now())
        .await?;
    Ok(Json(view))
}

/// `GET /v1/assignments` -- list by owner or by jury member.
#[utoipa::path(
    get,
    path = "/v1/assignments",
    tag = "Assignments",
    summary = "List assignments",
    params(ListAssignmentsQuery),
    responses(
        (status = 200, description = "Matching assignments", body = ListAssignmentsResponse),
        (status = 400, description = "Neither or both filters given", body = ErrorResponse),
    )
)]
pub async fn list_assignments(
    State(state): State<AppState>,
    Query(query): Query<ListAssignmentsQuery>,
) -> Result<Json<ListAssignmentsResponse>, ServerError> {
    let now = Utc::now();
    let assignments = match (query.user_id, query.jury_id) {
        (Some(owner), None) => {
            state
                .service
                .assignments_for_owner(&UserId::new(owner), now)
                .await?
        }
        (None, Some(juror)) => {
            state
                .service
                .assignments_for_juror(&UserId::new(juror), now)
                .await?
        }
        _ => {
            return Err(ServerError::BadRequest(
                "exactly one of userId or juryId is required".into(),
            ));
        }
    };
    Ok(Json(ListAssignmentsResponse {
        count: assignments.len(),
        assignments,
    }))
}

/// `POST /v1/assignments/{id}/methods/{name}/review` -- jury decision.
#[utoipa::path(
    post,
    path = "/v1/assignments/{id}/methods/{name}/review",
    tag = "Assignments",
    summary = "Review a verification method",
    description = "Approves, rejects or re-opens a verification method. The assignment owner is notified.",
    params(
        ("id" = String, Path, description = "Assignment ID"),
        ("name" = String, Path, description = "Verification method name"),
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review applied", body = ReviewOutcome),
        (status = 403, description = "Reviewer not on the jury or method not reviewable", body = ErrorResponse),
        (status = 404, description = "Unknown assignment, method or reviewer", body = ErrorResponse),
        (status = 409, description = "Assignment modified concurrently", body = ErrorResponse),
    )
)]
pub async fn review_method(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    Json(body): Json<ReviewRequest>,
) -> Result<Json<ReviewOutcome>, ServerError> {
    let review = Review {
        decision: body.decision,
        notes: body.notes,
        due_date: body.due_date,
    };
    let outcome = state
        .service
        .review(
            &AssignmentId::new(id),
            &name,
            &UserId::new(body.reviewer_id),
            review,
            Utc::now(),
        )
        .await?;
    Ok(Json(outcome))
}
