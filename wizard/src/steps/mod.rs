//! Wizard steps and their validators
//!
//! Each validator only looks at the fields its step collects, so an error on
//! one page never blocks another.

use serde::Serialize;

use crate::schema::validate::{check_choice, check_flag, check_service, check_storage_size, check_text};
use crate::schema::{DraftRecord, FieldErrors, FieldName, ServiceDraft};

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    GeneralInfo,
    ServiceSelection,
    Configuration,
    Review,
}

impl Step {
    pub const ALL: [Step; 4] = [
        Step::GeneralInfo,
        Step::ServiceSelection,
        Step::Configuration,
        Step::Review,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Step at a 0-based index
    pub fn from_index(index: usize) -> Option<Step> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            Step::GeneralInfo => 0,
            Step::ServiceSelection => 1,
            Step::Configuration => 2,
            Step::Review => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::GeneralInfo => "General Info",
            Step::ServiceSelection => "Service Selection",
            Step::Configuration => "Configuration",
            Step::Review => "Review & Deploy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Step::GeneralInfo => "Provide basic project details",
            Step::ServiceSelection => "Choose the type of service",
            Step::Configuration => "Set up service-specific options",
            Step::Review => "Confirm and launch your service",
        }
    }

    /// Following step, `None` on the last one
    pub fn next(&self) -> Option<Step> {
        Step::from_index(self.index() + 1)
    }

    /// Preceding step, `None` on the first one
    pub fn previous(&self) -> Option<Step> {
        self.index().checked_sub(1).and_then(Step::from_index)
    }

    pub fn is_last(&self) -> bool {
        self.next().is_none()
    }
}

/// Check whether `record` satisfies `step`
///
/// Returns every violation of the step at once. Pure: the caller decides what
/// to do with the errors.
pub fn validate_step(step: Step, record: &DraftRecord) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    match step {
        Step::GeneralInfo => {
            check_text(&mut errors, FieldName::ProjectName, &record.project_name);
            check_text(&mut errors, FieldName::Owner, &record.owner);
            check_choice(&mut errors, FieldName::Environment, &record.environment);
        }
        Step::ServiceSelection => {
            check_service(&mut errors, &record.service);
        }
        Step::Configuration => match record.service.as_set() {
            Some(ServiceDraft::Database(db)) => {
                check_choice(&mut errors, FieldName::Engine, &db.engine);
                check_storage_size(&mut errors, &db.storage_size);
            }
            Some(ServiceDraft::WebApp(web)) => {
                check_choice(&mut errors, FieldName::Framework, &web.framework);
                check_flag(&mut errors, FieldName::PublicAccess, &web.public_access);
            }
            // Nothing to configure without a variant; fail closed
            None => {
                check_service(&mut errors, &record.service);
            }
        },
        Step::Review => {}
    }

    errors.into_result(|| ())
}
