use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use scorecard_core::{User, UserId};

use crate::error::ServerError;

use super::AppState;
use super::schemas::ErrorResponse;

/// `POST /v1/users` -- register a user.
#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "Users",
    summary = "Create user",
    request_body = User,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Missing id or name", body = ErrorResponse),
        (status = 409, description = "User id already taken", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> Result<impl IntoResponse, ServerError> {
    let user = state.service.create_user(user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /v1/users/{id}` -- fetch a user.
#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    tag = "Users",
    summary = "Get user",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "User not found", body = ErrorResponse),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ServerError> {
    Ok(Json(state.service.get_user(&UserId::new(id)).await?))
}
