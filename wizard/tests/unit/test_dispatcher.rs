//! Dispatcher and submission gating tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use deploywiz::errors::WizardError;
use deploywiz::schema::{DeploymentRecord, Engine, Environment, FieldName, ServiceConfig};
use deploywiz::sessions::{self, SessionStore};
use deploywiz::submit::{
    Backend, BackendId, Dispatcher, Outcome, Payload, SubmissionStatus, WriteReceipt, VALIDATION_FAILED,
};
use deploywiz::wizard::{FieldEdit, WizardController};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

/// Backend that counts writes, optionally slowly or failing
struct CountingBackend {
    id: BackendId,
    writes: AtomicUsize,
    delay: Duration,
    fail_with: Option<String>,
}

impl CountingBackend {
    fn new(id: BackendId) -> Self {
        Self {
            id,
            writes: AtomicUsize::new(0),
            delay: Duration::ZERO,
            fail_with: None,
        }
    }

    fn slow(id: BackendId, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new(id)
        }
    }

    fn failing(id: BackendId, message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::new(id)
        }
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for CountingBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    async fn write(&self, payload: &Payload) -> Result<WriteReceipt, WizardError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.fail_with {
            Some(message) => Err(WizardError::BackendError(message.clone())),
            None => Ok(WriteReceipt {
                id: Some("doc-1".to_string()),
                payload: (self.id == BackendId::Raw).then(|| payload.to_json()),
            }),
        }
    }
}

fn database_record() -> DeploymentRecord {
    DeploymentRecord {
        project_name: "svc-a".to_string(),
        owner: "team-x".to_string(),
        environment: Environment::Dev,
        service: ServiceConfig::Database {
            engine: Engine::Postgres,
            storage_size: 10.0,
        },
    }
}

fn reach_review(wizard: &mut WizardController) {
    let edits = [
        (FieldName::ProjectName, json!("svc-a")),
        (FieldName::Owner, json!("team-x")),
        (FieldName::Environment, json!("dev")),
        (FieldName::ServiceType, json!("database")),
        (FieldName::Engine, json!("postgres")),
        (FieldName::StorageSize, json!(10)),
    ];
    for (field, value) in edits {
        wizard.apply_edit(&FieldEdit::new(field, value)).unwrap();
    }
    for _ in 0..3 {
        wizard.advance().unwrap();
    }
}

#[tokio::test]
async fn test_valid_record_succeeds_on_every_backend() {
    let backends: Vec<Arc<CountingBackend>> = BackendId::ALL
        .into_iter()
        .map(|id| Arc::new(CountingBackend::new(id)))
        .collect();
    let mut dispatcher = Dispatcher::new();
    for backend in &backends {
        dispatcher.register(backend.clone());
    }

    for backend in &backends {
        let outcome = dispatcher.submit(&database_record(), backend.id).await;
        assert!(outcome.is_success(), "{:?}", outcome);
        assert!(outcome.message().contains("svc-a"));
        assert!(outcome.message().contains("dev"));
        assert_eq!(backend.writes(), 1);
    }

    let outcome = dispatcher.submit(&database_record(), BackendId::MongoDb).await;
    assert_eq!(
        outcome.message(),
        "Service \"svc-a\" has been successfully deployed to dev! (saved to MongoDB)"
    );

    let raw = dispatcher.submit(&database_record(), BackendId::Raw).await;
    assert_eq!(raw.message(), "Service \"svc-a\" validated for dev. Raw payload shown below.");
    let payload = raw.payload().unwrap();
    assert_eq!(payload["storageSize"], json!(10.0));
    assert!(payload.get("createdAt").is_some());
    assert!(payload.get("framework").is_none());
}

#[tokio::test]
async fn test_invalid_record_never_reaches_backend() {
    let backend = Arc::new(CountingBackend::new(BackendId::Firestore));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(backend.clone());

    let mut record = database_record();
    record.service = ServiceConfig::Database {
        engine: Engine::Mysql,
        storage_size: -5.0,
    };
    let outcome = dispatcher.submit(&record, BackendId::Firestore).await;

    assert_eq!(
        outcome,
        Outcome::Failed {
            message: VALIDATION_FAILED.to_string()
        }
    );
    assert_eq!(backend.writes(), 0);
}

#[tokio::test]
async fn test_backend_fault_becomes_failed_outcome() {
    let backend = Arc::new(CountingBackend::failing(BackendId::Firestore, "deadline exceeded"));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(backend.clone());

    let outcome = dispatcher.submit(&database_record(), BackendId::Firestore).await;
    assert_eq!(
        outcome.message(),
        "Failed to save to Firestore: Backend error: deadline exceeded"
    );
    assert!(!outcome.is_success());
    assert_eq!(backend.writes(), 1);
}

#[tokio::test]
async fn test_unregistered_backend_fails() {
    let dispatcher = Dispatcher::new();
    let outcome = dispatcher.submit(&database_record(), BackendId::MongoDb).await;
    assert!(outcome.message().starts_with("Failed to save to MongoDB:"));
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_rejected() {
    let backend = Arc::new(CountingBackend::slow(BackendId::Firestore, Duration::from_millis(50)));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(backend.clone());

    let store = SessionStore::new(4, BackendId::Firestore);
    let (_, handle) = store.create();
    reach_review(&mut handle.lock().await.wizard);

    let (first, second) = futures::join!(
        sessions::submit(&handle, &dispatcher),
        sessions::submit(&handle, &dispatcher)
    );

    let first = assert_ok!(first);
    assert!(first.is_success());
    assert!(matches!(assert_err!(second), WizardError::SubmissionInProgress));
    assert_eq!(backend.writes(), 1);

    let session = handle.lock().await;
    assert_eq!(session.submission.status(), SubmissionStatus::Succeeded);
    assert_eq!(session.submission.state().message, first.message());
}

#[tokio::test]
async fn test_success_blocks_resubmission_until_backend_switch() {
    let firestore = Arc::new(CountingBackend::new(BackendId::Firestore));
    let raw = Arc::new(CountingBackend::new(BackendId::Raw));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(firestore.clone());
    dispatcher.register(raw.clone());

    let store = SessionStore::new(4, BackendId::Firestore);
    let (_, handle) = store.create();
    reach_review(&mut handle.lock().await.wizard);

    assert_ok!(sessions::submit(&handle, &dispatcher).await);
    assert!(matches!(
        sessions::submit(&handle, &dispatcher).await,
        Err(WizardError::AlreadySubmitted)
    ));
    assert_eq!(firestore.writes(), 1);

    handle.lock().await.submission.select_backend(BackendId::Raw).unwrap();
    let outcome = assert_ok!(sessions::submit(&handle, &dispatcher).await);
    assert!(outcome.payload().is_some());
    assert_eq!(raw.writes(), 1);
}

#[tokio::test]
async fn test_failed_attempt_can_be_retried() {
    let backend = Arc::new(CountingBackend::failing(BackendId::Firestore, "unavailable"));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(backend.clone());

    let store = SessionStore::new(4, BackendId::Firestore);
    let (_, handle) = store.create();
    reach_review(&mut handle.lock().await.wizard);

    let outcome = assert_ok!(sessions::submit(&handle, &dispatcher).await);
    assert!(!outcome.is_success());
    assert_eq!(handle.lock().await.submission.status(), SubmissionStatus::Failed);

    assert_ok!(sessions::submit(&handle, &dispatcher).await);
    assert_eq!(backend.writes(), 2);
}

#[tokio::test]
async fn test_submit_before_review_is_rejected() {
    let backend = Arc::new(CountingBackend::new(BackendId::Firestore));
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(backend.clone());

    let store = SessionStore::new(4, BackendId::Firestore);
    let (_, handle) = store.create();

    assert!(matches!(
        sessions::submit(&handle, &dispatcher).await,
        Err(WizardError::NotAtReview(0))
    ));
    assert_eq!(handle.lock().await.submission.status(), SubmissionStatus::Idle);
    assert_eq!(backend.writes(), 0);
}
