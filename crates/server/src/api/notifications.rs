use axum::Json;
use axum::extract::{Path, Query, State};

use scorecard_core::{Notification, NotificationId, UserId};

use crate::error::ServerError;

use super::AppState;
use super::schemas::{ErrorResponse, ListNotificationsQuery, ListNotificationsResponse};

/// `GET /v1/notifications?userId=` -- a user's notifications, newest first.
#[utoipa::path(
    get,
    path = "/v1/notifications",
    tag = "Notifications",
    summary = "List notifications",
    params(ListNotificationsQuery),
    responses(
        (status = 200, description = "Notifications", body = ListNotificationsResponse),
    )
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<ListNotificationsResponse>, ServerError> {
    let notifications = state.inbox.list_for(&UserId::new(query.user_id)).await?;
    let unread = notifications.iter().filter(|n| !n.read).count();
    Ok(Json(ListNotificationsResponse {
        notifications,
        unread,
    }))
}

/// `POST /v1/notifications/{id}/read` -- mark a notification as read.
#[utoipa::path(
    post,
    path = "/v1/notifications/{id}/read",
    tag = "Notifications",
    summary = "Mark notification read",
    params(("id" = String, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Updated notification", body = Notification),
        (status = 404, description = "Notification not found", body = ErrorResponse),
    )
)]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Notification>, ServerError> {
    state
        .inbox
        .mark_read(&NotificationId::new(id.as_str()))
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound(format!("notification {id}")))
}
