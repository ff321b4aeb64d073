//! Accepted deployment record

use serde::{Deserialize, Serialize};

use crate::schema::draft::{DatabaseDraft, DraftRecord, FieldValue, ServiceDraft, WebAppDraft};
use crate::schema::fields::{Choice, Engine, Environment, FieldName, Framework, ServiceType};

/// A deployment record that passed full validation
///
/// Serializes to the persisted shape: schema field names, the discriminant as
/// `serviceType`, and only the selected variant's fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub project_name: String,
    pub owner: String,
    pub environment: Environment,
    #[serde(flatten)]
    pub service: ServiceConfig,
}

/// Variant payload of an accepted record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "serviceType")]
pub enum ServiceConfig {
    #[serde(rename = "database", rename_all = "camelCase")]
    Database { engine: Engine, storage_size: f64 },

    #[serde(rename = "webapp", rename_all = "camelCase")]
    WebApp {
        framework: Framework,
        public_access: bool,
    },
}

impl ServiceConfig {
    pub fn service_type(&self) -> ServiceType {
        match self {
            ServiceConfig::Database { .. } => ServiceType::Database,
            ServiceConfig::WebApp { .. } => ServiceType::WebApp,
        }
    }
}

/// One line of the review summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub key: FieldName,
    pub label: &'static str,
    pub value: String,
}

impl SummaryLine {
    fn new(key: FieldName, value: impl Into<String>) -> Self {
        Self {
            key,
            label: key.label(),
            value: value.into(),
        }
    }
}

impl DeploymentRecord {
    pub fn service_type(&self) -> ServiceType {
        self.service.service_type()
    }

    /// Labelled display values for the review step
    pub fn summary(&self) -> Vec<SummaryLine> {
        let mut lines = vec![
            SummaryLine::new(FieldName::ProjectName, self.project_name.clone()),
            SummaryLine::new(FieldName::Owner, self.owner.clone()),
            SummaryLine::new(FieldName::Environment, self.environment.display_name()),
            SummaryLine::new(FieldName::ServiceType, self.service_type().display_name()),
        ];

        match &self.service {
            ServiceConfig::Database {
                engine,
                storage_size,
            } => {
                lines.push(SummaryLine::new(FieldName::Engine, engine.display_name()));
                lines.push(SummaryLine::new(
                    FieldName::StorageSize,
                    format!("{} GB", storage_size),
                ));
            }
            ServiceConfig::WebApp {
                framework,
                public_access,
            } => {
                lines.push(SummaryLine::new(FieldName::Framework, framework.display_name()));
                lines.push(SummaryLine::new(
                    FieldName::PublicAccess,
                    if *public_access { "Yes" } else { "No" },
                ));
            }
        }

        lines
    }
}

impl From<&DeploymentRecord> for DraftRecord {
    fn from(record: &DeploymentRecord) -> Self {
        let service = match &record.service {
            ServiceConfig::Database {
                engine,
                storage_size,
            } => ServiceDraft::Database(DatabaseDraft {
                engine: FieldValue::Set(*engine),
                storage_size: FieldValue::Set(*storage_size),
            }),
            ServiceConfig::WebApp {
                framework,
                public_access,
            } => ServiceDraft::WebApp(WebAppDraft {
                framework: FieldValue::Set(*framework),
                public_access: FieldValue::Set(*public_access),
            }),
        };

        DraftRecord {
            project_name: FieldValue::Set(record.project_name.clone()),
            owner: FieldValue::Set(record.owner.clone()),
            environment: FieldValue::Set(record.environment),
            service: FieldValue::Set(service),
        }
    }
}
