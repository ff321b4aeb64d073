//! Session API tests driven through the router

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use deploywiz::server::serve::router;
use deploywiz::server::state::ServerState;
use deploywiz::sessions::SessionStore;
use deploywiz::storage::settings::BackendSettings;
use deploywiz::submit::{BackendId, Dispatcher};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let sessions = Arc::new(SessionStore::new(16, BackendId::Raw));
    let dispatcher = Arc::new(Dispatcher::from_settings(&BackendSettings::default()).unwrap());
    router(Arc::new(ServerState::new(sessions, dispatcher)))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn set(app: &Router, id: &str, field: &str, value: Value) -> (StatusCode, Value) {
    call(
        app,
        "PATCH",
        &format!("/wizards/{id}/fields"),
        Some(json!({"field": field, "value": value})),
    )
    .await
}

async fn create(app: &Router) -> String {
    let (status, body) = call(app, "POST", "/wizards", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = call(&app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "deploywiz");
}

#[tokio::test]
async fn test_full_wizard_over_http() {
    let app = app();
    let id = create(&app).await;

    set(&app, &id, "projectName", json!("svc-a")).await;
    set(&app, &id, "owner", json!("team-x")).await;
    set(&app, &id, "environment", json!("dev")).await;
    let (status, body) = call(&app, "POST", &format!("/wizards/{id}/advance"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["wizard"]["currentStep"], 1);
    assert_eq!(body["wizard"]["step"]["title"], "Service Selection");

    set(&app, &id, "serviceType", json!("database")).await;
    call(&app, "POST", &format!("/wizards/{id}/advance"), None).await;
    set(&app, &id, "engine", json!("postgres")).await;
    set(&app, &id, "storageSize", json!("10")).await;
    let (_, body) = call(&app, "POST", &format!("/wizards/{id}/advance"), None).await;
    assert_eq!(body["wizard"]["currentStep"], 3);
    assert_eq!(body["wizard"]["summary"][5]["value"], "10 GB");

    let (status, body) = call(&app, "POST", &format!("/wizards/{id}/submit"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["success"], true);
    assert_eq!(
        body["outcome"]["message"],
        "Service \"svc-a\" validated for dev. Raw payload shown below."
    );
    assert_eq!(body["outcome"]["payload"]["engine"], "postgres");
    assert!(body["outcome"]["payload"]["createdAt"].is_string());
    assert_eq!(body["session"]["submission"]["status"], "succeeded");
    assert_eq!(body["session"]["submission"]["canSubmit"], false);

    let (status, _) = call(&app, "POST", &format!("/wizards/{id}/submit"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_blocked_advance_reports_field_errors() {
    let app = app();
    let id = create(&app).await;

    let (status, body) = call(&app, "POST", &format!("/wizards/{id}/advance"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["wizard"]["currentStep"], 0);
    assert_eq!(body["wizard"]["fieldErrors"]["projectName"], "Project name is required");
    assert_eq!(body["wizard"]["fieldErrors"]["environment"], "Environment is required");
}

#[tokio::test]
async fn test_edit_errors() {
    let app = app();
    let id = create(&app).await;

    let (status, body) = set(&app, &id, "region", json!("eu")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Unknown field: region");

    let (status, _) = set(&app, &id, "engine", json!("postgres")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = call(
        &app,
        "PUT",
        &format!("/wizards/{id}/backend"),
        Some(json!({"backend": "dynamodb"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_submit_before_review_is_rejected() {
    let app = app();
    let id = create(&app).await;

    let (status, body) = call(&app, "POST", &format!("/wizards/{id}/submit"), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("review step"));
}

#[tokio::test]
async fn test_backend_switch_resets_submission() {
    let app = app();
    let id = create(&app).await;

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/wizards/{id}/backend"),
        Some(json!({"backend": "mongodb"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["submission"]["backend"], "mongodb");
    assert_eq!(body["submission"]["status"], "idle");
    assert_eq!(body["submission"]["message"], "");
}

#[tokio::test]
async fn test_unknown_and_deleted_sessions() {
    let app = app();
    let (status, _) = call(&app, "GET", "/wizards/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let id = create(&app).await;
    let (status, _) = call(&app, "DELETE", &format!("/wizards/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, "GET", &format!("/wizards/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().starts_with("Session not found"));
}
