//! Catalog-level scenarios: polymorphic containment, nested backbone
//! recursion, and the depth guard

use fhirconform::{Severity, ValidationConfig, catalog, conform, conform_default};
use serde_json::{Value, json};

#[test]
fn test_contained_resource_dispatched_by_tag() {
    let patient = json!({
        "resourceType": "Patient",
        "contained": [{"resourceType": "Organization", "name": "Acme Clinic"}],
        "managingOrganization": {"reference": "#org1"}
    });
    let outcome = conform_default("Patient", &patient);
    assert!(outcome.is_valid, "unexpected issues: {:?}", outcome.issues);
}

#[test]
fn test_contained_resource_issues_carry_indexed_path() {
    let patient = json!({
        "resourceType": "Patient",
        "contained": [{"resourceType": "Organization", "shoeSize": 9}]
    });
    let outcome = conform_default("Patient", &patient);
    assert_eq!(outcome.issues.len(), 1);
    assert!(outcome.issues[0].diagnostics.contains("Patient.contained[0]"));
    assert!(outcome.issues[0].diagnostics.contains("shoeSize"));
}

#[test]
fn test_contained_unknown_type_is_fatal() {
    let patient = json!({
        "resourceType": "Patient",
        "contained": [{"resourceType": "Martian"}]
    });
    let outcome = conform_default("Patient", &patient);
    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].severity, Severity::Fatal);
    assert_eq!(outcome.issues[0].code, "not-supported");
    assert!(outcome.issues[0].diagnostics.contains("Martian"));
}

#[test]
fn test_questionnaire_with_nested_items() {
    let questionnaire = json!({
        "resourceType": "Questionnaire",
        "status": "active",
        "item": [{
            "linkId": "1",
            "type": "group",
            "item": [
                {"linkId": "1.1", "type": "boolean", "text": "Do you smoke?"},
                {"linkId": "1.2", "type": "quantity", "text": "Pack years"}
            ]
        }]
    });
    let outcome = conform_default("Questionnaire", &questionnaire);
    assert!(outcome.is_valid, "unexpected issues: {:?}", outcome.issues);
}

#[test]
fn test_nested_item_issue_path() {
    let questionnaire = json!({
        "resourceType": "Questionnaire",
        "status": "active",
        "item": [{"linkId": "1", "type": "group", "item": [{"linkId": "1.1", "type": "teleport"}]}]
    });
    let outcome = conform_default("Questionnaire", &questionnaire);
    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].code, "code-invalid");
    assert!(
        outcome.issues[0]
            .diagnostics
            .contains("Questionnaire.item[0].item[0].type")
    );
}

#[test]
fn test_depth_guard_stops_pathological_nesting() {
    // Build an item chain deeper than the configured guard
    let mut item = json!({"linkId": "leaf", "type": "display"});
    for level in 0..8 {
        item = json!({"linkId": format!("level-{level}"), "type": "group", "item": [item]});
    }
    let questionnaire = json!({"resourceType": "Questionnaire", "status": "active", "item": [item]});

    let registry = catalog::build_registry(ValidationConfig { max_depth: 4 }).unwrap();
    let outcome = conform(&registry, "Questionnaire", &questionnaire);
    assert!(!outcome.is_valid);
    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].severity, Severity::Fatal);
    assert_eq!(outcome.issues[0].code, "too-deep");

    // The default guard is generous enough for the same document
    let outcome = conform_default("Questionnaire", &questionnaire);
    assert!(outcome.is_valid, "unexpected issues: {:?}", outcome.issues);
}

#[test]
fn test_encounter_with_period_and_subject() {
    let encounter = json!({
        "resourceType": "Encounter",
        "status": "finished",
        "class": {"system": "http://terminology.hl7.org/CodeSystem/v3-ActCode", "code": "AMB"},
        "subject": {"reference": "Patient/example"},
        "period": {"start": "2020-01-01T09:00:00Z", "end": "2020-01-01T10:00:00Z"}
    });
    let outcome = conform_default("Encounter", &encounter);
    assert!(outcome.is_valid, "unexpected issues: {:?}", outcome.issues);
}

#[test]
fn test_encounter_period_inversion_surfaces_nested_invariant() {
    let encounter = json!({
        "resourceType": "Encounter",
        "status": "finished",
        "class": {"code": "AMB"},
        "period": {"start": "2020-01-02T09:00:00Z", "end": "2020-01-01T10:00:00Z"}
    });
    let outcome = conform_default("Encounter", &encounter);
    assert_eq!(outcome.issues.len(), 1);
    assert_eq!(outcome.issues[0].code, "invariant");
    assert!(outcome.issues[0].diagnostics.contains("Encounter.period"));
}

#[test]
fn test_operation_outcome_rendering() {
    let outcome = conform_default("Patient", &json!({"resourceType": "Patient"}));
    let doc = outcome.to_operation_outcome();
    assert_eq!(doc["resourceType"], json!("OperationOutcome"));
    assert_eq!(doc["issue"].as_array().map(Vec::len), Some(1));
    assert_eq!(doc["issue"][0]["severity"], json!("information"));

    let outcome = conform_default("Patient", &json!({"resourceType": "Patient", "gender": "x"}));
    let doc: Value = outcome.to_operation_outcome();
    assert_eq!(doc["issue"][0]["code"], json!("code-invalid"));
}
