//! Wizard controller
//!
//! Owns the step position, the draft and the current field errors. Nothing
//! else may move the step or replace the errors.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::WizardError;
use crate::schema::{validate_full, DeploymentRecord, DraftRecord, FieldErrors, SummaryLine};
use crate::steps::{validate_step, Step};
use crate::wizard::edit::{apply_edit, EditEffect, FieldEdit};

/// Read-only view handed to the rendering layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub current_step: usize,
    pub step_count: usize,
    pub step: Step,
    pub record: Map<String, Value>,
    pub field_errors: FieldErrors,
    /// Present on the review step once the record validates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Vec<SummaryLine>>,
}

/// Step-wise wizard state machine
#[derive(Debug, Clone)]
pub struct WizardController {
    step: Step,
    record: DraftRecord,
    field_errors: FieldErrors,
}

impl WizardController {
    /// Create a wizard on the first step with an empty draft
    pub fn new() -> Self {
        Self {
            step: Step::GeneralInfo,
            record: DraftRecord::new(),
            field_errors: FieldErrors::new(),
        }
    }

    /// Get the current step
    pub fn current_step(&self) -> Step {
        self.step
    }

    /// Get the 0-based index of the current step
    pub fn current_step_index(&self) -> usize {
        self.step.index()
    }

    /// Get the draft
    pub fn record(&self) -> &DraftRecord {
        &self.record
    }

    /// Get the errors of the last validation attempt
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// Apply an edit from the input layer without validating
    pub fn apply_edit(&mut self, edit: &FieldEdit) -> Result<EditEffect, WizardError> {
        let effect = apply_edit(&mut self.record, edit)?;
        if let EditEffect::BranchReset { from, to } = effect {
            debug!("Service type changed from {:?} to {:?}, variant fields reset", from, to);
        }
        Ok(effect)
    }

    /// Validate the current step and move forward on success
    ///
    /// Errors from the attempt replace the previous ones. Advancing from the
    /// last step is a no-op.
    pub fn advance(&mut self) -> Result<Step, FieldErrors> {
        match validate_step(self.step, &self.record) {
            Ok(()) => {
                self.field_errors = FieldErrors::new();
                if let Some(next) = self.step.next() {
                    debug!("Wizard step {:?} -> {:?}", self.step, next);
                    self.step = next;
                }
                Ok(self.step)
            }
            Err(errors) => {
                debug!("Wizard step {:?} blocked: {}", self.step, errors);
                self.field_errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Move back one step; never validates and never clears errors
    pub fn retreat(&mut self) -> Step {
        if let Some(previous) = self.step.previous() {
            debug!("Wizard step {:?} -> {:?}", self.step, previous);
            self.step = previous;
        }
        self.step
    }

    /// Validate the whole record on the review step and release it
    pub fn finish(&mut self) -> Result<DeploymentRecord, WizardError> {
        if !self.step.is_last() {
            return Err(WizardError::NotAtReview(self.step.index()));
        }

        match validate_full(&self.record) {
            Ok(record) => {
                self.field_errors = FieldErrors::new();
                Ok(record)
            }
            Err(errors) => {
                self.field_errors = errors.clone();
                Err(WizardError::Validation(errors))
            }
        }
    }

    /// Build a read-only snapshot
    pub fn snapshot(&self) -> WizardSnapshot {
        let summary = if self.step.is_last() {
            validate_full(&self.record).ok().map(|r| r.summary())
        } else {
            None
        };

        WizardSnapshot {
            current_step: self.step.index(),
            step_count: Step::COUNT,
            step: self.step,
            record: self.record.to_json(),
            field_errors: self.field_errors.clone(),
            summary,
        }
    }
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}
