//! Deployment record schema
//!
//! The record is a tagged union keyed by `serviceType`. Drafts carry the
//! in-progress state; [`validate_full`] turns a draft into a
//! [`DeploymentRecord`] or reports every violation at once.

pub mod draft;
pub mod fields;
pub mod record;
pub mod validate;

pub use draft::{DatabaseDraft, DraftRecord, FieldValue, ServiceDraft, WebAppDraft};
pub use fields::{Choice, Engine, Environment, FieldName, Framework, ServiceType};
pub use record::{DeploymentRecord, ServiceConfig, SummaryLine};
pub use validate::{validate_full, FieldErrors};
