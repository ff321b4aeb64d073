//! Canonical submission payload

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::errors::WizardError;
use crate::schema::DeploymentRecord;

pub const CREATED_AT: &str = "createdAt";

/// The accepted record's fields plus the attempt timestamp
///
/// Every backend receives the same payload; each encodes `createdAt` its own
/// way.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    fields: Map<String, Value>,
    created_at: DateTime<Utc>,
}

impl Payload {
    pub fn new(record: &DeploymentRecord, created_at: DateTime<Utc>) -> Result<Self, WizardError> {
        let fields = match serde_json::to_value(record)? {
            Value::Object(fields) => fields,
            other => {
                return Err(WizardError::BackendError(format!(
                    "record did not serialize to an object: {}",
                    other
                )))
            }
        };
        Ok(Self { fields, created_at })
    }

    /// Record fields without `createdAt`
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// RFC 3339 timestamp with millisecond precision and a `Z` suffix
    pub fn created_at_rfc3339(&self) -> String {
        self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Plain JSON rendition with `createdAt` as an RFC 3339 string
    pub fn to_json(&self) -> Value {
        let mut map = self.fields.clone();
        map.insert(CREATED_AT.to_string(), Value::String(self.created_at_rfc3339()));
        Value::Object(map)
    }
}
