//! Submission backends

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::WizardError;
use crate::submit::payload::Payload;

/// Backend identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendId {
    #[default]
    Firestore,
    #[serde(rename = "mongodb")]
    MongoDb,
    Raw,
}

impl BackendId {
    pub const ALL: [BackendId; 3] = [BackendId::Firestore, BackendId::MongoDb, BackendId::Raw];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Firestore => "firestore",
            BackendId::MongoDb => "mongodb",
            BackendId::Raw => "raw",
        }
    }

    /// Display name used in outcome messages
    pub fn label(&self) -> &'static str {
        match self {
            BackendId::Firestore => "Firestore",
            BackendId::MongoDb => "MongoDB",
            BackendId::Raw => "Raw Result",
        }
    }

    /// Whether a successful write stores the record somewhere
    pub fn persists(&self) -> bool {
        !matches!(self, BackendId::Raw)
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendId {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| WizardError::UnknownBackend(s.to_string()))
    }
}

/// What a backend reports after a successful write
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteReceipt {
    /// Identifier assigned by the store, if any
    pub id: Option<String>,
    /// Payload to show to the user, if any
    pub payload: Option<Value>,
}

/// A destination for accepted records
///
/// Implementations perform exactly one write per call and never retry.
#[async_trait]
pub trait Backend: Send + Sync {
    fn id(&self) -> BackendId;

    async fn write(&self, payload: &Payload) -> Result<WriteReceipt, WizardError>;
}
