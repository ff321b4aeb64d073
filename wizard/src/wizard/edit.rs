//! Field edits coming from the input layer

use serde_json::Value;

use crate::errors::WizardError;
use crate::schema::{
    Choice, DatabaseDraft, DraftRecord, FieldName, FieldValue, ServiceDraft, ServiceType, WebAppDraft,
};

/// A single `(fieldName, newValue)` edit; `null` clears the field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEdit {
    pub field: FieldName,
    pub value: Value,
}

impl FieldEdit {
    pub fn new(field: FieldName, value: impl Into<Value>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Build an edit from a raw field name
    pub fn parse(field: &str, value: Value) -> Result<Self, WizardError> {
        Ok(Self {
            field: field.parse()?,
            value,
        })
    }
}

/// What an applied edit did to the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEffect {
    /// A single field was updated
    Updated,
    /// `serviceType` changed; every variant field was reset
    BranchReset {
        from: Option<ServiceType>,
        to: Option<ServiceType>,
    },
    /// `serviceType` was set to its current value
    Unchanged,
}

/// Apply `edit` to `record`
///
/// Never validates. Fails only when the field name is unknown or when a
/// variant field is edited while another (or no) variant is selected.
pub fn apply_edit(record: &mut DraftRecord, edit: &FieldEdit) -> Result<EditEffect, WizardError> {
    match edit.field {
        FieldName::ProjectName => record.project_name = read_text(&edit.value),
        FieldName::Owner => record.owner = read_text(&edit.value),
        FieldName::Environment => record.environment = read_choice(&edit.value),
        FieldName::ServiceType => return Ok(set_service_type(record, read_choice(&edit.value))),
        FieldName::Engine => variant_database(record, edit.field)?.engine = read_choice(&edit.value),
        FieldName::StorageSize => {
            variant_database(record, edit.field)?.storage_size = read_number(&edit.value)
        }
        FieldName::Framework => {
            variant_webapp(record, edit.field)?.framework = read_choice(&edit.value)
        }
        FieldName::PublicAccess => {
            variant_webapp(record, edit.field)?.public_access = read_flag(&edit.value)
        }
    }
    Ok(EditEffect::Updated)
}

/// Assign the discriminant, resetting both variants' fields on change
fn set_service_type(record: &mut DraftRecord, value: FieldValue<ServiceType>) -> EditEffect {
    let from = record.service_type();
    let next = match value {
        FieldValue::Set(service_type) if from == Some(service_type) => return EditEffect::Unchanged,
        FieldValue::Set(service_type) => FieldValue::Set(ServiceDraft::empty(service_type)),
        FieldValue::Unset => FieldValue::Unset,
        FieldValue::Rejected(raw) => FieldValue::Rejected(raw),
    };
    if next == record.service {
        return EditEffect::Unchanged;
    }

    record.service = next;
    EditEffect::BranchReset {
        from,
        to: record.service_type(),
    }
}

fn not_applicable(service: Option<ServiceType>, field: FieldName) -> WizardError {
    WizardError::FieldNotApplicable {
        field,
        service: service
            .map(|s| s.as_str().to_string())
            .unwrap_or_else(|| "unset".to_string()),
    }
}

fn variant_database(record: &mut DraftRecord, field: FieldName) -> Result<&mut DatabaseDraft, WizardError> {
    let service = record.service_type();
    record
        .database_mut()
        .ok_or_else(|| not_applicable(service, field))
}

fn variant_webapp(record: &mut DraftRecord, field: FieldName) -> Result<&mut WebAppDraft, WizardError> {
    let service = record.service_type();
    record
        .webapp_mut()
        .ok_or_else(|| not_applicable(service, field))
}

// ================================ VALUE READERS ================================== //

fn read_text(value: &Value) -> FieldValue<String> {
    match value {
        Value::Null => FieldValue::Unset,
        Value::String(s) => FieldValue::Set(s.clone()),
        other => FieldValue::Rejected(other.to_string()),
    }
}

fn read_choice<T: Choice>(value: &Value) -> FieldValue<T> {
    match value {
        Value::Null => FieldValue::Unset,
        Value::String(s) if s.is_empty() => FieldValue::Unset,
        Value::String(s) => T::parse(s).map_or_else(|| FieldValue::Rejected(s.clone()), FieldValue::Set),
        other => FieldValue::Rejected(other.to_string()),
    }
}

/// Numbers, or strings holding a number as a browser number input would send
fn read_number(value: &Value) -> FieldValue<f64> {
    match value {
        Value::Null => FieldValue::Unset,
        Value::Number(n) => n
            .as_f64()
            .map_or_else(|| FieldValue::Rejected(n.to_string()), FieldValue::Set),
        Value::String(s) if s.trim().is_empty() => FieldValue::Unset,
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => FieldValue::Set(n),
            _ => FieldValue::Rejected(s.clone()),
        },
        other => FieldValue::Rejected(other.to_string()),
    }
}

fn read_flag(value: &Value) -> FieldValue<bool> {
    match value {
        Value::Null => FieldValue::Unset,
        Value::Bool(b) => FieldValue::Set(*b),
        Value::String(s) if s == "true" => FieldValue::Set(true),
        Value::String(s) if s == "false" => FieldValue::Set(false),
        other => FieldValue::Rejected(other.to_string()),
    }
}
