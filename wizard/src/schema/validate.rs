//! Field rules and full-record validation

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::schema::draft::{DraftRecord, FieldValue, ServiceDraft};
use crate::schema::fields::{Choice, FieldName};
use crate::schema::record::{DeploymentRecord, ServiceConfig};

/// Field-level validation errors, one message per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FieldName, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FieldName, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fields with an error, in form order
    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> + '_ {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// Errors keyed by schema name
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(f, m)| (f.as_str().to_string(), m.clone()))
            .collect()
    }

    /// `Ok(value)` when empty, `Err(self)` otherwise
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        f.write_str(&parts.join("; "))
    }
}

// ================================ FIELD RULES ==================================== //

/// Non-empty, non-whitespace text
pub(crate) fn check_text(
    errors: &mut FieldErrors,
    field: FieldName,
    value: &FieldValue<String>,
) -> Option<String> {
    match value {
        FieldValue::Set(s) if !s.trim().is_empty() => Some(s.clone()),
        FieldValue::Rejected(_) => {
            errors.insert(field, field.invalid_message());
            None
        }
        _ => {
            errors.insert(field, field.missing_message());
            None
        }
    }
}

/// Member of the field's declared set
pub(crate) fn check_choice<T: Choice>(
    errors: &mut FieldErrors,
    field: FieldName,
    value: &FieldValue<T>,
) -> Option<T> {
    match value {
        FieldValue::Set(v) => Some(*v),
        FieldValue::Unset => {
            errors.insert(field, field.missing_message());
            None
        }
        FieldValue::Rejected(_) => {
            errors.insert(field, field.invalid_message());
            None
        }
    }
}

/// Finite number strictly greater than zero
pub(crate) fn check_storage_size(errors: &mut FieldErrors, value: &FieldValue<f64>) -> Option<f64> {
    let field = FieldName::StorageSize;
    match value {
        FieldValue::Set(n) if !n.is_finite() => {
            errors.insert(field, field.invalid_message());
            None
        }
        FieldValue::Set(n) if *n > 0.0 => Some(*n),
        FieldValue::Rejected(_) => {
            errors.insert(field, field.invalid_message());
            None
        }
        _ => {
            errors.insert(field, field.missing_message());
            None
        }
    }
}

/// Boolean flag; absence reads as `false`
pub(crate) fn check_flag(errors: &mut FieldErrors, field: FieldName, value: &FieldValue<bool>) -> Option<bool> {
    match value {
        FieldValue::Set(b) => Some(*b),
        FieldValue::Unset => Some(false),
        FieldValue::Rejected(_) => {
            errors.insert(field, field.invalid_message());
            None
        }
    }
}

/// The discriminant must select a known variant
pub(crate) fn check_service<'a>(
    errors: &mut FieldErrors,
    value: &'a FieldValue<ServiceDraft>,
) -> Option<&'a ServiceDraft> {
    let field = FieldName::ServiceType;
    match value {
        FieldValue::Set(service) => Some(service),
        FieldValue::Unset => {
            errors.insert(field, field.missing_message());
            None
        }
        FieldValue::Rejected(_) => {
            errors.insert(field, field.invalid_message());
            None
        }
    }
}

// =============================== FULL VALIDATION ================================= //

/// Validate a complete record against the branch its discriminant selects
///
/// Every violation is reported at once. Only the selected variant is inspected
/// and only its fields reach the accepted record.
pub fn validate_full(record: &DraftRecord) -> Result<DeploymentRecord, FieldErrors> {
    let mut errors = FieldErrors::new();

    let project_name = check_text(&mut errors, FieldName::ProjectName, &record.project_name);
    let owner = check_text(&mut errors, FieldName::Owner, &record.owner);
    let environment = check_choice(&mut errors, FieldName::Environment, &record.environment);

    let service = check_service(&mut errors, &record.service).and_then(|service| match service {
        ServiceDraft::Database(db) => {
            let engine = check_choice(&mut errors, FieldName::Engine, &db.engine);
            let storage_size = check_storage_size(&mut errors, &db.storage_size);
            Some(ServiceConfig::Database {
                engine: engine?,
                storage_size: storage_size?,
            })
        }
        ServiceDraft::WebApp(web) => {
            let framework = check_choice(&mut errors, FieldName::Framework, &web.framework);
            let public_access = check_flag(&mut errors, FieldName::PublicAccess, &web.public_access);
            Some(ServiceConfig::WebApp {
                framework: framework?,
                public_access: public_access?,
            })
        }
    });

    match (project_name, owner, environment, service) {
        (Some(project_name), Some(owner), Some(environment), Some(service)) if errors.is_empty() => {
            Ok(DeploymentRecord {
                project_name,
                owner,
                environment,
                service,
            })
        }
        _ => Err(errors),
    }
}
