//! In-progress deployment record

use serde_json::{Map, Value};

use crate::schema::fields::{Choice, Engine, Environment, FieldName, Framework, ServiceType};

/// State of a single draft field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<T> {
    Unset,
    Set(T),
    /// Input that could not be read as `T`, kept verbatim for the error message
    Rejected(String),
}

impl<T> Default for FieldValue<T> {
    fn default() -> Self {
        FieldValue::Unset
    }
}

impl<T> FieldValue<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, FieldValue::Unset)
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            FieldValue::Set(v) => Some(v),
            _ => None,
        }
    }
}

impl<T: Choice> FieldValue<T> {
    fn to_json(&self) -> Option<Value> {
        match self {
            FieldValue::Unset => None,
            FieldValue::Set(v) => Some(Value::String(v.as_str().to_string())),
            FieldValue::Rejected(raw) => Some(Value::String(raw.clone())),
        }
    }
}

/// Database variant fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatabaseDraft {
    pub engine: FieldValue<Engine>,
    /// Gigabytes
    pub storage_size: FieldValue<f64>,
}

/// Web app variant fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WebAppDraft {
    pub framework: FieldValue<Framework>,
    pub public_access: FieldValue<bool>,
}

/// Variant payload of the draft; only the selected variant's fields exist
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceDraft {
    Database(DatabaseDraft),
    WebApp(WebAppDraft),
}

impl ServiceDraft {
    /// A variant payload with every field unset
    pub fn empty(service_type: ServiceType) -> Self {
        match service_type {
            ServiceType::Database => ServiceDraft::Database(DatabaseDraft::default()),
            ServiceType::WebApp => ServiceDraft::WebApp(WebAppDraft::default()),
        }
    }

    pub fn service_type(&self) -> ServiceType {
        match self {
            ServiceDraft::Database(_) => ServiceType::Database,
            ServiceDraft::WebApp(_) => ServiceType::WebApp,
        }
    }
}

/// A partially filled deployment record
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DraftRecord {
    pub project_name: FieldValue<String>,
    pub owner: FieldValue<String>,
    pub environment: FieldValue<Environment>,
    /// Discriminant together with its variant payload
    pub service: FieldValue<ServiceDraft>,
}

impl DraftRecord {
    /// An empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected service type, if the discriminant holds a known variant
    pub fn service_type(&self) -> Option<ServiceType> {
        self.service.as_set().map(ServiceDraft::service_type)
    }

    pub fn database(&self) -> Option<&DatabaseDraft> {
        match &self.service {
            FieldValue::Set(ServiceDraft::Database(db)) => Some(db),
            _ => None,
        }
    }

    pub fn webapp(&self) -> Option<&WebAppDraft> {
        match &self.service {
            FieldValue::Set(ServiceDraft::WebApp(web)) => Some(web),
            _ => None,
        }
    }

    pub(crate) fn database_mut(&mut self) -> Option<&mut DatabaseDraft> {
        match &mut self.service {
            FieldValue::Set(ServiceDraft::Database(db)) => Some(db),
            _ => None,
        }
    }

    pub(crate) fn webapp_mut(&mut self) -> Option<&mut WebAppDraft> {
        match &mut self.service {
            FieldValue::Set(ServiceDraft::WebApp(web)) => Some(web),
            _ => None,
        }
    }

    /// `engine`, unset unless the database variant is selected
    pub fn engine(&self) -> FieldValue<Engine> {
        self.database().map(|db| db.engine.clone()).unwrap_or_default()
    }

    /// `storageSize`, unset unless the database variant is selected
    pub fn storage_size(&self) -> FieldValue<f64> {
        self.database()
            .map(|db| db.storage_size.clone())
            .unwrap_or_default()
    }

    /// `framework`, unset unless the web app variant is selected
    pub fn framework(&self) -> FieldValue<Framework> {
        self.webapp().map(|web| web.framework.clone()).unwrap_or_default()
    }

    /// `publicAccess`, unset unless the web app variant is selected
    pub fn public_access(&self) -> FieldValue<bool> {
        self.webapp()
            .map(|web| web.public_access.clone())
            .unwrap_or_default()
    }

    /// JSON view of the draft keyed by schema names; unset fields are omitted
    pub fn to_json(&self) -> Map<String, Value> {
        let mut map = Map::new();
        let mut put = |field: FieldName, value: Option<Value>| {
            if let Some(value) = value {
                map.insert(field.as_str().to_string(), value);
            }
        };

        put(FieldName::ProjectName, text_json(&self.project_name));
        put(FieldName::Owner, text_json(&self.owner));
        put(FieldName::Environment, self.environment.to_json());

        match &self.service {
            FieldValue::Unset => {}
            FieldValue::Rejected(raw) => put(FieldName::ServiceType, Some(Value::String(raw.clone()))),
            FieldValue::Set(service) => {
                put(
                    FieldName::ServiceType,
                    Some(Value::String(service.service_type().as_str().to_string())),
                );
                match service {
                    ServiceDraft::Database(db) => {
                        put(FieldName::Engine, db.engine.to_json());
                        put(FieldName::StorageSize, number_json(&db.storage_size));
                    }
                    ServiceDraft::WebApp(web) => {
                        put(FieldName::Framework, web.framework.to_json());
                        put(FieldName::PublicAccess, flag_json(&web.public_access));
                    }
                }
            }
        }

        map
    }
}

fn text_json(value: &FieldValue<String>) -> Option<Value> {
    match value {
        FieldValue::Unset => None,
        FieldValue::Set(s) | FieldValue::Rejected(s) => Some(Value::String(s.clone())),
    }
}

fn number_json(value: &FieldValue<f64>) -> Option<Value> {
    match value {
        FieldValue::Unset => None,
        FieldValue::Set(n) => Some(serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number)),
        FieldValue::Rejected(raw) => Some(Value::String(raw.clone())),
    }
}

fn flag_json(value: &FieldValue<bool>) -> Option<Value> {
    match value {
        FieldValue::Unset => None,
        FieldValue::Set(b) => Some(Value::Bool(*b)),
        FieldValue::Rejected(raw) => Some(Value::String(raw.clone())),
    }
}
