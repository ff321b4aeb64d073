//! Error types for deploywiz

use thiserror::Error;

use crate::schema::{FieldErrors, FieldName};

/// Main error type for deploywiz
///
/// Field-level validation failures travel as [`FieldErrors`]; this enum wraps
/// them only where a caller needs a single error type.
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("MongoDB error: {0}")]
    MongoError(#[from] mongodb::error::Error),

    #[error("BSON encoding error: {0}")]
    BsonError(#[from] mongodb::bson::ser::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Shutdown error: {0}")]
    ShutdownError(String),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {field} does not apply to service type {service}")]
    FieldNotApplicable { field: FieldName, service: String },

    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("The wizard is on step {0}; submission requires the review step")]
    NotAtReview(usize),

    #[error("A submission is already in progress")]
    SubmissionInProgress,

    #[error("This record has already been submitted")]
    AlreadySubmitted,
}

impl From<FieldErrors> for WizardError {
    fn from(errors: FieldErrors) -> Self {
        WizardError::Validation(errors)
    }
}
