//! MongoDB backend

use std::time::Duration;

use async_trait::async_trait;
use mongodb::bson::{self, Bson, DateTime, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::errors::WizardError;
use crate::storage::settings::MongoDbSettings;
use crate::submit::backend::{Backend, BackendId, WriteReceipt};
use crate::submit::payload::{Payload, CREATED_AT};

/// Inserts one document per write into `<database>.<collection>`
pub struct MongoDbBackend {
    uri: Option<SecretString>,
    timeout: Duration,
    database: String,
    collection: String,
    client: OnceCell<Client>,
}

impl MongoDbBackend {
    /// Build the backend; the connection is opened on first write
    pub fn new(settings: &MongoDbSettings, timeout: Duration) -> Self {
        Self {
            uri: settings.uri(),
            timeout,
            database: settings.database.clone(),
            collection: settings.collection.clone(),
            client: OnceCell::new(),
        }
    }

    /// Document stored for `payload`, with `createdAt` as a BSON date
    pub fn document(payload: &Payload) -> Result<Document, WizardError> {
        let mut document = bson::to_document(payload.fields())?;
        document.insert(
            CREATED_AT,
            DateTime::from_millis(payload.created_at().timestamp_millis()),
        );
        Ok(document)
    }

    async fn collection(&self) -> Result<Collection<Document>, WizardError> {
        let uri = self.uri.as_ref().ok_or_else(|| {
            WizardError::ConfigError("MongoDB is not configured (missing connection URI)".to_string())
        })?;

        let client = self
            .client
            .get_or_try_init(|| async move {
                let mut options = ClientOptions::parse(uri.expose_secret())
                    .await
                    .map_err(|e| WizardError::ConfigError(format!("Invalid MongoDB URI: {}", describe_error(&e))))?;
                options.app_name = Some("deploywiz".to_string());
                options.connect_timeout = Some(self.timeout);
                options.server_selection_timeout = Some(self.timeout);
                debug!("Opening MongoDB client");
                Client::with_options(options).map_err(WizardError::from)
            })
            .await?;

        Ok(client.database(&self.database).collection(&self.collection))
    }
}

/// Condense a driver error to the server's own message where there is one
pub fn describe_error(err: &MongoError) -> String {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => format!("{} (code {})", e.message, e.code),
        ErrorKind::Write(WriteFailure::WriteConcernError(e)) => format!("{} (code {})", e.message, e.code),
        ErrorKind::Command(e) => format!("{} ({})", e.message, e.code_name),
        _ => err.to_string(),
    }
}

#[async_trait]
impl Backend for MongoDbBackend {
    fn id(&self) -> BackendId {
        BackendId::MongoDb
    }

    async fn write(&self, payload: &Payload) -> Result<WriteReceipt, WizardError> {
        let collection = self.collection().await?;
        let document = Self::document(payload)?;

        debug!("Inserting document into {}.{}", self.database, self.collection);
        let result = collection
            .insert_one(document)
            .await
            .map_err(|e| WizardError::BackendError(describe_error(&e)))?;

        let id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(id) => id,
            other => other.to_string(),
        };
        info!("MongoDB document inserted: {}", id);

        Ok(WriteReceipt {
            id: Some(id),
            payload: None,
        })
    }
}
