pub mod assignments;
pub mod files;
pub mod health;
pub mod notifications;
pub mod openapi;
pub mod schemas;
pub mod upload;
pub mod users;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use scorecard_notify::NotificationInbox;
use scorecard_workflow::EvidenceService;

use openapi::ApiDoc;

/// Room for multipart boundaries and the text fields on top of the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EvidenceService>,
    /// Read side of stored notifications.
    pub inbox: NotificationInbox,
}

/// Build the Axum router with all API routes, middleware, and Swagger UI.
pub fn router(state: AppState) -> Router {
    let upload_limit = usize::try_from(state.service.policy().max_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/health", get(health::health))
        // Evidence files
        .route(
            "/api/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/files/{*path}", get(files::download))
        // Records
        .route("/v1/users", post(users::create_user))
        .route("/v1/users/{id}", get(users::get_user))
        .route(
            "/v1/assignments",
            post(assignments::create_assignment).get(assignments::list_assignments),
        )
        .route("/v1/assignments/{id}", get(assignments::get_assignment))
        .route(
            "/v1/assignments/{id}/methods/{name}/review",
            post(assignments::review_method),
        )
        // Notifications
        .route("/v1/notifications", get(notifications::list_notifications))
        .route(
            "/v1/notifications/{id}/read",
            post(notifications::mark_read),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
