//! Wizard controller tests

use deploywiz::errors::WizardError;
use deploywiz::schema::{validate_full, FieldName, FieldValue, ServiceType};
use deploywiz::steps::{validate_step, Step};
use deploywiz::wizard::{EditEffect, FieldEdit, WizardController};
use serde_json::{json, Value};

fn edit(wizard: &mut WizardController, field: FieldName, value: Value) -> EditEffect {
    wizard.apply_edit(&FieldEdit::new(field, value)).unwrap()
}

fn fill_general(wizard: &mut WizardController, project_name: &str) {
    edit(wizard, FieldName::ProjectName, json!(project_name));
    edit(wizard, FieldName::Owner, json!("team-x"));
    edit(wizard, FieldName::Environment, json!("dev"));
}

#[test]
fn test_wizard_initial_state() {
    let wizard = WizardController::new();
    assert_eq!(wizard.current_step(), Step::GeneralInfo);
    assert!(wizard.field_errors().is_empty());
    assert!(wizard.record().to_json().is_empty());
}

#[test]
fn test_database_flow_reaches_review() {
    let mut wizard = WizardController::new();

    fill_general(&mut wizard, "svc-a");
    assert_eq!(wizard.advance().unwrap(), Step::ServiceSelection);

    edit(&mut wizard, FieldName::ServiceType, json!("database"));
    assert_eq!(wizard.advance().unwrap(), Step::Configuration);

    edit(&mut wizard, FieldName::Engine, json!("postgres"));
    edit(&mut wizard, FieldName::StorageSize, json!(10));
    assert_eq!(wizard.advance().unwrap(), Step::Review);

    let snapshot = wizard.snapshot();
    let summary = snapshot.summary.unwrap();
    let storage = summary.iter().find(|l| l.key == FieldName::StorageSize).unwrap();
    assert_eq!(storage.value, "10 GB");
    assert_eq!(storage.label, "Storage Size");

    let record = wizard.finish().unwrap();
    assert_eq!(record.service_type(), ServiceType::Database);
}

#[test]
fn test_service_selection_requires_service_type() {
    let mut wizard = WizardController::new();
    fill_general(&mut wizard, "svc-a");
    wizard.advance().unwrap();

    let errors = wizard.advance().unwrap_err();
    assert_eq!(errors.get(FieldName::ServiceType), Some("Please select a service type"));
    assert_eq!(wizard.current_step(), Step::ServiceSelection);

    let full = validate_full(wizard.record()).unwrap_err();
    assert!(full.contains(FieldName::ServiceType));
}

#[test]
fn test_switching_service_type_clears_variant_fields() {
    let mut wizard = WizardController::new();
    edit(&mut wizard, FieldName::ServiceType, json!("database"));
    edit(&mut wizard, FieldName::Engine, json!("mysql"));
    edit(&mut wizard, FieldName::StorageSize, json!(20));

    let effect = edit(&mut wizard, FieldName::ServiceType, json!("webapp"));
    assert_eq!(
        effect,
        EditEffect::BranchReset {
            from: Some(ServiceType::Database),
            to: Some(ServiceType::WebApp),
        }
    );
    assert!(wizard.record().engine().is_unset());
    assert!(wizard.record().storage_size().is_unset());
    assert!(wizard.record().framework().is_unset());
    assert!(wizard.record().public_access().is_unset());

    edit(&mut wizard, FieldName::Framework, json!("python"));
    edit(&mut wizard, FieldName::PublicAccess, json!(true));
    edit(&mut wizard, FieldName::ServiceType, json!("database"));
    assert!(wizard.record().framework().is_unset());
    assert!(wizard.record().public_access().is_unset());

    let record = wizard.record().to_json();
    assert_eq!(record.get("serviceType"), Some(&json!("database")));
    assert_eq!(record.len(), 1);
}

#[test]
fn test_retreat_keeps_errors_and_record() {
    let mut wizard = WizardController::new();
    fill_general(&mut wizard, "svc-a");
    wizard.advance().unwrap();
    assert!(wizard.advance().is_err());

    let errors = wizard.field_errors().clone();
    let record = wizard.record().clone();

    assert_eq!(wizard.retreat(), Step::GeneralInfo);
    assert_eq!(wizard.field_errors(), &errors);
    assert_eq!(wizard.record(), &record);
}

#[test]
fn test_storage_size_scenario() {
    let mut wizard = WizardController::new();
    edit(&mut wizard, FieldName::ServiceType, json!("database"));
    edit(&mut wizard, FieldName::StorageSize, json!(-5));

    let step_errors = validate_step(Step::Configuration, wizard.record()).unwrap_err();
    assert_eq!(
        step_errors.fields().collect::<Vec<_>>(),
        vec![FieldName::Engine, FieldName::StorageSize]
    );
    assert_eq!(
        step_errors.get(FieldName::StorageSize),
        Some("Storage size must be greater than 0")
    );

    let full_errors = validate_full(wizard.record()).unwrap_err();
    assert_eq!(full_errors.get(FieldName::Engine), step_errors.get(FieldName::Engine));
    assert_eq!(
        full_errors.get(FieldName::StorageSize),
        step_errors.get(FieldName::StorageSize)
    );
    assert!(full_errors.contains(FieldName::ProjectName));
    assert!(!full_errors.contains(FieldName::ServiceType));
}

#[test]
fn test_empty_project_name_scenario() {
    let mut wizard = WizardController::new();
    edit(&mut wizard, FieldName::ProjectName, json!(""));
    edit(&mut wizard, FieldName::Owner, json!("team-y"));
    edit(&mut wizard, FieldName::Environment, json!("prod"));
    edit(&mut wizard, FieldName::ServiceType, json!("webapp"));
    edit(&mut wizard, FieldName::Framework, json!("nextjs"));
    edit(&mut wizard, FieldName::PublicAccess, json!(true));

    let errors = validate_step(Step::GeneralInfo, wizard.record()).unwrap_err();
    assert_eq!(errors.fields().collect::<Vec<_>>(), vec![FieldName::ProjectName]);
    assert!(validate_step(Step::Configuration, wizard.record()).is_ok());
}

#[test]
fn test_finish_failure_replaces_field_errors() {
    let mut wizard = WizardController::new();
    fill_general(&mut wizard, "svc-a");
    wizard.advance().unwrap();
    edit(&mut wizard, FieldName::ServiceType, json!("webapp"));
    wizard.advance().unwrap();
    edit(&mut wizard, FieldName::Framework, json!("nuxt"));
    wizard.advance().unwrap();

    // Edits on the review step are not validated until finish
    edit(&mut wizard, FieldName::Owner, json!("   "));
    assert!(wizard.snapshot().summary.is_none());

    match wizard.finish() {
        Err(WizardError::Validation(errors)) => {
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec![FieldName::Owner]);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(wizard.field_errors().contains(FieldName::Owner));

    edit(&mut wizard, FieldName::Owner, json!("team-x"));
    let record = wizard.finish().unwrap();
    assert!(wizard.field_errors().is_empty());
    assert_eq!(
        serde_json::to_value(&record).unwrap()["publicAccess"],
        json!(false)
    );
}

#[test]
fn test_rejected_values_surface_on_advance() {
    let mut wizard = WizardController::new();
    fill_general(&mut wizard, "svc-a");
    edit(&mut wizard, FieldName::Environment, json!("qa"));
    assert_eq!(wizard.record().environment, FieldValue::Rejected("qa".to_string()));

    let errors = wizard.advance().unwrap_err();
    assert_eq!(
        errors.get(FieldName::Environment),
        Some("Environment must be one of: dev, staging, prod")
    );
}

#[test]
fn test_non_text_values_are_rejected() {
    let mut wizard = WizardController::new();
    edit(&mut wizard, FieldName::ProjectName, json!(42));
    edit(&mut wizard, FieldName::Owner, json!(true));
    edit(&mut wizard, FieldName::Environment, json!("dev"));

    let errors = validate_step(Step::GeneralInfo, wizard.record()).unwrap_err();
    assert_eq!(errors.get(FieldName::ProjectName), Some("Project name must be text"));
    assert_eq!(errors.get(FieldName::Owner), Some("Owner must be text"));

    assert!(wizard.advance().is_err());
    assert_eq!(wizard.current_step(), Step::GeneralInfo);
    assert!(validate_full(wizard.record()).unwrap_err().contains(FieldName::ProjectName));
}
