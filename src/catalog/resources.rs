//! Top-level resource shapes
//!
//! Each resource also exposes a standalone validate function over the
//! builtin registry, so a shape can be checked outside `conform` by passing
//! a fresh issue list.

use crate::error::SchemaResult;
use crate::issue::Issue;
use crate::registry::{Registry, ShapeEntry, ShapeKind};
use crate::schema::{Attribute as A, DeclaredType::*, PrimitiveKind as P, Schema};
use crate::validator::at_most_one_of;
use serde_json::Value;

const ADMINISTRATIVE_GENDER: &[&str] = &["male", "female", "other", "unknown"];
const ENCOUNTER_STATUS: &[&str] = &[
    "planned",
    "arrived",
    "triaged",
    "in-progress",
    "onleave",
    "finished",
    "cancelled",
    "entered-in-error",
    "unknown",
];
const PUBLICATION_STATUS: &[&str] = &["draft", "active", "retired", "unknown"];

pub fn entries() -> SchemaResult<Vec<ShapeEntry>> {
    Ok(vec![
        patient()?,
        organization()?,
        practitioner()?,
        encounter()?,
        questionnaire()?,
    ])
}

fn patient() -> SchemaResult<ShapeEntry> {
    let schema = Schema::resource(vec![
        A::new("identifier", Complex("Identifier")).array(),
        A::new("active", Primitive(P::Boolean)),
        A::new("name", Complex("HumanName")).array(),
        A::new("telecom", Complex("ContactPoint")).array(),
        A::new("gender", Primitive(P::Code)).with_enum(ADMINISTRATIVE_GENDER),
        A::new("birthDate", Primitive(P::Date)),
        A::new("deceasedBoolean", Primitive(P::Boolean)),
        A::new("deceasedDateTime", Primitive(P::DateTime)),
        A::new("address", Complex("Address")).array(),
        A::new("maritalStatus", Complex("CodeableConcept")),
        A::new("multipleBirthBoolean", Primitive(P::Boolean)),
        A::new("multipleBirthInteger", Primitive(P::Integer)),
        A::new("photo", Complex("Attachment")).array(),
        A::new("contact", Backbone("PatientContact")).array(),
        A::new("communication", Backbone("PatientCommunication")).array(),
        A::new("generalPractitioner", Reference)
            .array()
            .with_targets(&["Organization", "Practitioner", "PractitionerRole"]),
        A::new("managingOrganization", Reference).with_targets(&["Organization"]),
        A::new("link", Backbone("PatientLink")).array(),
    ])?;
    Ok(ShapeEntry::new("Patient", ShapeKind::Resource, schema)
        .with_check(at_most_one_of(&["deceasedBoolean", "deceasedDateTime"], "deceased[x]"))
        .with_check(at_most_one_of(
            &["multipleBirthBoolean", "multipleBirthInteger"],
            "multipleBirth[x]",
        )))
}

fn organization() -> SchemaResult<ShapeEntry> {
    let schema = Schema::resource(vec![
        A::new("identifier", Complex("Identifier")).array(),
        A::new("active", Primitive(P::Boolean)),
        A::new("type", Complex("CodeableConcept")).array(),
        A::new("name", Primitive(P::String)),
        A::new("alias", Primitive(P::String)).array(),
        A::new("telecom", Complex("ContactPoint")).array(),
        A::new("address", Complex("Address")).array(),
        A::new("partOf", Reference).with_targets(&["Organization"]),
    ])?;
    Ok(ShapeEntry::new("Organization", ShapeKind::Resource, schema))
}

fn practitioner() -> SchemaResult<ShapeEntry> {
    let schema = Schema::resource(vec![
        A::new("identifier", Complex("Identifier")).array(),
        A::new("active", Primitive(P::Boolean)),
        A::new("name", Complex("HumanName")).array(),
        A::new("telecom", Complex("ContactPoint")).array(),
        A::new("address", Complex("Address")).array(),
        A::new("gender", Primitive(P::Code)).with_enum(ADMINISTRATIVE_GENDER),
        A::new("birthDate", Primitive(P::Date)),
    ])?;
    Ok(ShapeEntry::new("Practitioner", ShapeKind::Resource, schema))
}

fn encounter() -> SchemaResult<ShapeEntry> {
    let schema = Schema::resource(vec![
        A::new("identifier", Complex("Identifier")).array(),
        A::new("status", Primitive(P::Code)).required().with_enum(ENCOUNTER_STATUS),
        A::new("class", Complex("Coding")).required(),
        A::new("type", Complex("CodeableConcept")).array(),
        A::new("subject", Reference).with_targets(&["Patient", "Group"]),
        A::new("period", Complex("Period")),
        A::new("length", Complex("Duration")),
        A::new("reasonCode", Complex("CodeableConcept")).array(),
        A::new("serviceProvider", Reference).with_targets(&["Organization"]),
        A::new("partOf", Reference).with_targets(&["Encounter"]),
    ])?;
    Ok(ShapeEntry::new("Encounter", ShapeKind::Resource, schema))
}

fn questionnaire() -> SchemaResult<ShapeEntry> {
    let schema = Schema::resource(vec![
        A::new("url", Primitive(P::Uri)),
        A::new("identifier", Complex("Identifier")).array(),
        A::new("version", Primitive(P::String)),
        A::new("name", Primitive(P::String)),
        A::new("title", Primitive(P::String)),
        A::new("status", Primitive(P::Code)).required().with_enum(PUBLICATION_STATUS),
        A::new("experimental", Primitive(P::Boolean)),
        A::new("date", Primitive(P::DateTime)),
        A::new("publisher", Primitive(P::String)),
        A::new("description", Primitive(P::Markdown)),
        A::new("item", Backbone("QuestionnaireItem")).array(),
    ])?;
    Ok(ShapeEntry::new("Questionnaire", ShapeKind::Resource, schema))
}

/// Validate an instance as a Patient against the builtin registry.
pub fn validate_patient(instance: &Value, issues: &mut Vec<Issue>) {
    Registry::builtin().validate("Patient", instance, "Patient", issues);
}

/// Validate an instance as an Organization against the builtin registry.
pub fn validate_organization(instance: &Value, issues: &mut Vec<Issue>) {
    Registry::builtin().validate("Organization", instance, "Organization", issues);
}

/// Validate an instance as a Practitioner against the builtin registry.
pub fn validate_practitioner(instance: &Value, issues: &mut Vec<Issue>) {
    Registry::builtin().validate("Practitioner", instance, "Practitioner", issues);
}

/// Validate an instance as an Encounter against the builtin registry.
pub fn validate_encounter(instance: &Value, issues: &mut Vec<Issue>) {
    Registry::builtin().validate("Encounter", instance, "Encounter", issues);
}

/// Validate an instance as a Questionnaire against the builtin registry.
pub fn validate_questionnaire(instance: &Value, issues: &mut Vec<Issue>) {
    Registry::builtin().validate("Questionnaire", instance, "Questionnaire", issues);
}
