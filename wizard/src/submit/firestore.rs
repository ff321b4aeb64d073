//! Firestore REST backend

use std::time::Duration;

use async_trait::async_trait;
use openapi_client::models::firestore::{Document, ErrorResponse, Value as FirestoreValue};
use tracing::{debug, info};
use url::Url;

use crate::errors::WizardError;
use crate::http::client::{ApiKey, HttpClient};
use crate::storage::settings::FirestoreSettings;
use crate::submit::backend::{Backend, BackendId, WriteReceipt};
use crate::submit::payload::{Payload, CREATED_AT};

struct Target {
    client: HttpClient,
    documents_path: String,
}

/// Creates one document per write in the configured collection
pub struct FirestoreBackend {
    target: Option<Target>,
    missing: Vec<&'static str>,
}

impl FirestoreBackend {
    /// Build the backend; incomplete settings only fail at write time
    pub fn new(settings: &FirestoreSettings, timeout: Duration) -> Result<Self, WizardError> {
        let mut missing = Vec::new();
        if Url::parse(&settings.base_url).is_err() {
            missing.push("a valid base URL");
        }
        let project_id = settings.project_id.as_deref().filter(|p| !p.is_empty());
        if project_id.is_none() {
            missing.push("project id");
        }
        let api_key = settings.api_key();
        if api_key.is_none() {
            missing.push("API key");
        }

        let target = match (project_id, api_key) {
            (Some(project_id), Some(api_key)) if missing.is_empty() => {
                let client = HttpClient::with_api_key(
                    &settings.base_url,
                    timeout,
                    ApiKey {
                        name: "key",
                        value: api_key,
                    },
                )?;
                Some(Target {
                    client,
                    documents_path: format!(
                        "/projects/{}/databases/{}/documents/{}",
                        project_id, settings.database, settings.collection
                    ),
                })
            }
            _ => None,
        };

        Ok(Self { target, missing })
    }

    /// Typed Firestore document for `payload`
    pub fn document(payload: &Payload) -> Document {
        let mut fields: std::collections::BTreeMap<String, FirestoreValue> = payload
            .fields()
            .iter()
            .map(|(k, v)| (k.clone(), FirestoreValue::from_json(v)))
            .collect();
        fields.insert(
            CREATED_AT.to_string(),
            FirestoreValue::TimestampValue(payload.created_at_rfc3339()),
        );

        Document {
            fields,
            ..Default::default()
        }
    }
}

#[async_trait]
impl Backend for FirestoreBackend {
    fn id(&self) -> BackendId {
        BackendId::Firestore
    }

    async fn write(&self, payload: &Payload) -> Result<WriteReceipt, WizardError> {
        let target = self.target.as_ref().ok_or_else(|| {
            WizardError::ConfigError(format!("Firestore is not configured (missing {})", self.missing.join(", ")))
        })?;

        debug!("Creating Firestore document in {}", target.documents_path);
        let created: Document = target
            .client
            .post(&target.documents_path, &Self::document(payload))
            .await
            .map_err(describe_error)?;

        info!("Firestore document created: {}", created.name.as_deref().unwrap_or("<unnamed>"));
        Ok(WriteReceipt {
            id: created.name,
            payload: None,
        })
    }
}

/// Prefer the message from Firestore's error envelope over the raw body
fn describe_error(err: WizardError) -> WizardError {
    match err {
        WizardError::HttpStatus { status, body } => match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(envelope) => WizardError::BackendError(format!("{} ({})", envelope.error.message, status)),
            Err(_) => WizardError::HttpStatus { status, body },
        },
        other => other,
    }
}
