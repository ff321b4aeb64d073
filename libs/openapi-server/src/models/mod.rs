//! Session API models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Version response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,

    /// Field-level errors, present when the failure is a validation failure
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<String, String>,
}

/// Step metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepView {
    pub index: usize,
    pub title: String,
    pub description: String,
}

/// One line of the review summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryLineView {
    pub key: String,
    pub label: String,
    pub value: String,
}

/// Read-only wizard snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub current_step: usize,
    pub step_count: usize,
    pub step: StepView,
    pub record: Map<String, Value>,
    pub field_errors: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Vec<SummaryLineView>>,
}

/// Submission status for the selected backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionView {
    pub backend: String,
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    pub can_submit: bool,
}

/// Full session response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: String,
    pub wizard: WizardView,
    pub submission: SubmissionView,
}

/// Field edit request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldEditRequest {
    pub field: String,
    #[serde(default)]
    pub value: Value,
}

/// Backend selection request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendRequest {
    pub backend: String,
}

/// Outcome of one submission attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeView {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

/// Submit response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub outcome: OutcomeView,
    pub session: SessionResponse,
}
