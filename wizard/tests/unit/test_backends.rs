//! Document-store backend tests

use std::time::Duration;

use chrono::{TimeZone, Utc};
use deploywiz::schema::{DeploymentRecord, Environment, Framework, ServiceConfig};
use deploywiz::storage::settings::{BackendSettings, FirestoreSettings, MongoDbSettings};
use deploywiz::submit::firestore::FirestoreBackend;
use deploywiz::submit::{Backend, BackendId, Dispatcher, Payload};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOCUMENTS_PATH: &str = "/projects/demo/databases/test-db/documents/deployments";

fn webapp_record() -> DeploymentRecord {
    DeploymentRecord {
        project_name: "web-b".to_string(),
        owner: "team-y".to_string(),
        environment: Environment::Prod,
        service: ServiceConfig::WebApp {
            framework: Framework::Nuxt,
            public_access: false,
        },
    }
}

fn firestore_settings(server: &MockServer) -> FirestoreSettings {
    FirestoreSettings {
        base_url: server.uri(),
        project_id: Some("demo".to_string()),
        database: "test-db".to_string(),
        api_key: Some("fs-key".to_string()),
        ..Default::default()
    }
}


#[tokio::test]
async fn test_firestore_creates_typed_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DOCUMENTS_PATH))
        .and(query_param("key", "fs-key"))
        .and(body_partial_json(json!({"fields": {
            "projectName": {"stringValue": "web-b"},
            "publicAccess": {"booleanValue": false},
            "createdAt": {"timestampValue": "2024-05-01T08:00:00.000Z"}
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "projects/demo/databases/test-db/documents/deployments/abc123",
            "fields": {},
            "createTime": "2024-05-01T08:00:01.000Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = FirestoreBackend::new(&firestore_settings(&server), Duration::from_secs(5)).unwrap();
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    let receipt = backend
        .write(&Payload::new(&webapp_record(), created_at).unwrap())
        .await
        .unwrap();

    assert_eq!(
        receipt.id.as_deref(),
        Some("projects/demo/databases/test-db/documents/deployments/abc123")
    );
}

#[tokio::test]
async fn test_firestore_error_is_reported_in_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(DOCUMENTS_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": {
            "code": 403,
            "message": "Missing or insufficient permissions.",
            "status": "PERMISSION_DENIED"
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let settings = BackendSettings {
        firestore: firestore_settings(&server),
        ..Default::default()
    };
    let dispatcher = Dispatcher::from_settings(&settings).unwrap();
    let outcome = dispatcher.submit(&webapp_record(), BackendId::Firestore).await;

    assert!(!outcome.is_success());
    assert!(outcome.message().starts_with("Failed to save to Firestore:"));
    assert!(outcome.message().contains("insufficient permissions"));
}

#[tokio::test]
async fn test_mongodb_rejects_malformed_uri() {
    let settings = BackendSettings {
        mongodb: MongoDbSettings {
            uri: Some("https://cluster0.example.net".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };
    let dispatcher = Dispatcher::from_settings(&settings).unwrap();
    let outcome = dispatcher.submit(&webapp_record(), BackendId::MongoDb).await;

    assert!(!outcome.is_success());
    assert!(outcome.message().starts_with("Failed to save to MongoDB:"));
    assert!(outcome.message().contains("Invalid MongoDB URI"));
}

#[tokio::test]
async fn test_missing_configuration_fails_at_submit_time() {
    let dispatcher = Dispatcher::from_settings(&BackendSettings::default()).unwrap();

    let firestore = dispatcher.submit(&webapp_record(), BackendId::Firestore).await;
    assert!(firestore.message().contains("Firestore is not configured"));
    assert!(firestore.message().contains("project id"));

    let mongodb = dispatcher.submit(&webapp_record(), BackendId::MongoDb).await;
    assert!(mongodb.message().starts_with("Failed to save to MongoDB:"));
    assert!(mongodb.message().contains("connection URI"));

    let raw = dispatcher.submit(&webapp_record(), BackendId::Raw).await;
    assert!(raw.is_success());
}
