//! Wizard controller and field edits

pub mod controller;
pub mod edit;

pub use controller::{WizardController, WizardSnapshot};
pub use edit::{EditEffect, FieldEdit};
