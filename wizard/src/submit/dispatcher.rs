//! Submission dispatcher

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::errors::WizardError;
use crate::schema::{validate_full, Choice, DeploymentRecord, DraftRecord};
use crate::storage::settings::BackendSettings;
use crate::submit::backend::{Backend, BackendId, WriteReceipt};
use crate::submit::firestore::FirestoreBackend;
use crate::submit::mongodb::MongoDbBackend;
use crate::submit::payload::Payload;
use crate::submit::raw::RawBackend;
use crate::submit::state::Outcome;

pub const VALIDATION_FAILED: &str = "Validation failed. Please check your input.";

/// Routes accepted records to the selected backend
#[derive(Default)]
pub struct Dispatcher {
    backends: HashMap<BackendId, Arc<dyn Backend>>,
}

impl Dispatcher {
    /// Create a dispatcher with no backends
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher with all three backends built from `settings`
    pub fn from_settings(settings: &BackendSettings) -> Result<Self, WizardError> {
        let timeout = Duration::from_secs(settings.request_timeout_secs);

        let mut dispatcher = Self::new();
        dispatcher.register(Arc::new(FirestoreBackend::new(&settings.firestore, timeout)?));
        dispatcher.register(Arc::new(MongoDbBackend::new(&settings.mongodb, timeout)));
        dispatcher.register(Arc::new(RawBackend::new()));
        Ok(dispatcher)
    }

    /// Register `backend`, replacing any backend with the same id
    pub fn register(&mut self, backend: Arc<dyn Backend>) {
        self.backends.insert(backend.id(), backend);
    }

    /// Submit `record` to `backend`
    ///
    /// Re-validates first and performs at most one write. Every fault ends up
    /// in [`Outcome::Failed`].
    pub async fn submit(&self, record: &DeploymentRecord, backend: BackendId) -> Outcome {
        if let Err(errors) = validate_full(&DraftRecord::from(record)) {
            warn!("Submission to {} rejected by validation: {}", backend, errors);
            return Outcome::Failed {
                message: VALIDATION_FAILED.to_string(),
            };
        }

        let result = match self.backends.get(&backend) {
            Some(target) => match Payload::new(record, Utc::now()) {
                Ok(payload) => target.write(&payload).await,
                Err(e) => Err(e),
            },
            None => Err(WizardError::ConfigError("backend is not registered".to_string())),
        };

        match result {
            Ok(receipt) => {
                info!(
                    "Record {:?} submitted to {} (id: {})",
                    record.project_name,
                    backend,
                    receipt.id.as_deref().unwrap_or("-")
                );
                success(record, backend, receipt)
            }
            Err(e) => {
                error!("Submission to {} failed: {}", backend, e);
                Outcome::Failed {
                    message: format!("Failed to save to {}: {}", backend.label(), e),
                }
            }
        }
    }
}

fn success(record: &DeploymentRecord, backend: BackendId, receipt: WriteReceipt) -> Outcome {
    let environment = record.environment.as_str();
    if backend.persists() {
        Outcome::Succeeded {
            message: format!(
                "Service \"{}\" has been successfully deployed to {}! (saved to {})",
                record.project_name,
                environment,
                backend.label()
            ),
            payload: receipt.payload,
        }
    } else {
        Outcome::Succeeded {
            message: format!(
                "Service \"{}\" validated for {}. Raw payload shown below.",
                record.project_name, environment
            ),
            payload: receipt.payload,
        }
    }
}
