use axum::Router;
use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use scorecard_server::config::ScorecardConfig;

const BOUNDARY: &str = "scorecard-test-boundary";
const PDF: &[u8] = b"%PDF-1.7 evidence";

// -- Helpers --------------------------------------------------------------

fn build_app_with(max_upload_bytes: u64) -> Router {
    let mut config = ScorecardConfig::default();
    config.storage.backend = "memory".into();
    config.server.max_upload_bytes = max_upload_bytes;
    let state = scorecard_server::factory::build_app_state(&config).expect("state should build");
    scorecard_server::api::router(state)
}

fn build_app() -> Router {
    build_app_with(1024 * 1024)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(http::Method::POST)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn multipart_upload(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(http::Method::POST)
        .uri("/api/upload")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn upload_fields<'a>(method: &'a str, user: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("assignedIndicatorId", "asg-1"),
        ("verificationMethodName", method),
        ("userId", user),
    ]
}

/// Users `ana` (owner) and `luis` (juror), plus assignment `asg-1` with an
/// open method `acta` and an expired method `informe`.
async fn seed(app: &Router) {
    for (id, name, role) in [
        ("ana", "Ana Ruiz", "responsable"),
        ("luis", "Luis", "calificador"),
        ("mallory", "Mallory", "responsable"),
    ] {
        let (status, _) = send(
            app,
            post_json("/v1/users", &json!({"id": id, "name": name, "role": role})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        app,
        post_json(
            "/v1/assignments",
            &json!({
                "id": "asg-1",
                "userId": "ana",
                "indicatorId": "ind-7",
                "jury": ["luis"],
                "verificationMethods": [
                    {"name": "acta", "dueDate": Utc::now() + Duration::days(3)},
                    {"name": "informe", "dueDate": Utc::now() - Duration::days(1)},
                ],
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["overallStatus"], "pending");
}

// -- Tests ----------------------------------------------------------------

#[tokio::test]
async fn health_returns_200() {
    let app = build_app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["metrics"]["uploadsAccepted"], 0);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = build_app();
    let (status, body) = send(&app, get("/api-doc/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/upload"].is_object());
}

#[tokio::test]
async fn upload_review_and_notify_flow() {
    let app = build_app();
    seed(&app).await;

    let (status, file) = send(
        &app,
        multipart_upload(
            &upload_fields("acta", "ana"),
            Some(("Acta Final.pdf", "application/pdf", PDF)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let url = file["url"].as_str().unwrap().to_owned();
    assert!(url.starts_with("/api/files/Ana_Ruiz/acta_asg-1_"));
    assert_eq!(file["originalName"], "Acta Final.pdf");
    assert_eq!(file["type"], "application/pdf");
    assert_eq!(file["size"], PDF.len());

    // The stored file is served back.
    let response = app.clone().oneshot(get(&url)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[http::header::CONTENT_TYPE],
        "application/pdf"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], PDF);

    let (_, assignment) = send(&app, get("/v1/assignments/asg-1")).await;
    assert_eq!(assignment["overallStatus"], "submitted");
    assert_eq!(
        assignment["assignedVerificationMethods"][0]["status"],
        "submitted"
    );
    assert_eq!(assignment["effectiveStatuses"]["informe"], "overdue");
    assert_eq!(assignment["assignedVerificationMethods"][1]["status"], "pending");

    let (status, inbox) = send(&app, get("/v1/notifications?userId=luis")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inbox["unread"], 1);
    assert_eq!(inbox["notifications"][0]["kind"], "evidence_submitted");

    let (status, outcome) = send(
        &app,
        post_json(
            "/v1/assignments/asg-1/methods/acta/review",
            &json!({"reviewerId": "luis", "decision": "reject", "notes": "illegible"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["methodStatus"], "rejected");
    assert_eq!(outcome["assignment"]["overallStatus"], "rejected");
    assert_eq!(outcome["ownerNotified"], true);

    let (_, inbox) = send(&app, get("/v1/notifications?userId=ana")).await;
    let id = inbox["notifications"][0]["id"].as_str().unwrap().to_owned();
    let (status, marked) = send(
        &app,
        post_json(&format!("/v1/notifications/{id}/read"), &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(marked["read"], true);

    let (_, health) = send(&app, get("/health")).await;
    assert_eq!(health["metrics"]["uploadsAccepted"], 1);
    assert_eq!(health["metrics"]["reviews"], 1);
}

#[tokio::test]
async fn upload_missing_field_is_400() {
    let app = build_app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        multipart_upload(
            &[("assignedIndicatorId", "asg-1"), ("userId", "ana")],
            Some(("a.pdf", "application/pdf", PDF)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
    assert_eq!(body["error"], "invalid request: missing field: verificationMethodName");

    let (status, _) = send(&app, multipart_upload(&upload_fields("acta", "ana"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_after_deadline_is_403() {
    let app = build_app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        multipart_upload(
            &upload_fields("informe", "ana"),
            Some(("a.pdf", "application/pdf", PDF)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "deadline_passed");
}

#[tokio::test]
async fn upload_by_non_owner_is_403() {
    let app = build_app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        multipart_upload(
            &upload_fields("acta", "mallory"),
            Some(("a.pdf", "application/pdf", PDF)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "not_owner");
}

#[tokio::test]
async fn upload_unknown_method_or_user_is_404() {
    let app = build_app();
    seed(&app).await;

    let (status, _) = send(
        &app,
        multipart_upload(
            &upload_fields("fotos", "ana"),
            Some(("a.pdf", "application/pdf", PDF)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        multipart_upload(
            &upload_fields("acta", "ghost"),
            Some(("a.pdf", "application/pdf", PDF)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "user not found: ghost");
}

#[tokio::test]
async fn upload_rejects_disallowed_type_and_oversized_file() {
    let app = build_app_with(8);
    seed(&app).await;

    let (status, body) = send(
        &app,
        multipart_upload(
            &upload_fields("acta", "ana"),
            Some(("a.png", "image/png", b"png")),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");

    let (status, body) = send(
        &app,
        multipart_upload(
            &upload_fields("acta", "ana"),
            Some(("a.pdf", "application/pdf", PDF)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["kind"], "too_large");
}

#[tokio::test]
async fn second_upload_on_submitted_method_is_403() {
    let app = build_app();
    seed(&app).await;
    let upload = || {
        multipart_upload(
            &upload_fields("acta", "ana"),
            Some(("a.pdf", "application/pdf", PDF)),
        )
    };

    let (status, _) = send(&app, upload()).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, upload()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "invalid_state");
}

#[tokio::test]
async fn file_download_errors() {
    let app = build_app();

    let (status, _) = send(&app, get("/api/files/Ana_Ruiz/missing.pdf")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/api/files/Ana_Ruiz/%2E%2E/secret.pdf")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn review_by_non_juror_is_403() {
    let app = build_app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/v1/assignments/asg-1/methods/acta/review",
            &json!({"reviewerId": "mallory", "decision": "approve"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "review_denied");
}

#[tokio::test]
async fn list_assignments_by_owner_and_juror() {
    let app = build_app();
    seed(&app).await;

    let (status, body) = send(&app, get("/v1/assignments?userId=ana")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (_, body) = send(&app, get("/v1/assignments?juryId=luis")).await;
    assert_eq!(body["assignments"][0]["id"], "asg-1");

    let (_, body) = send(&app, get("/v1/assignments?juryId=ana")).await;
    assert_eq!(body["count"], 0);

    let (status, _) = send(&app, get("/v1/assignments")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_records_conflict() {
    let app = build_app();
    seed(&app).await;

    let (status, body) = send(
        &app,
        post_json(
            "/v1/users",
            &json!({"id": "ana", "name": "Ana", "role": "admin"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "already_exists");
}

#[tokio::test]
async fn mark_unknown_notification_is_404() {
    let app = build_app();
    let (status, _) = send(&app, post_json("/v1/notifications/nope/read", &json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
