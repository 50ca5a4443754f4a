//! Backbone (nested) structure shapes

use crate::error::SchemaResult;
use crate::registry::{ShapeEntry, ShapeKind};
use crate::schema::{Attribute as A, DeclaredType::*, PrimitiveKind as P, Schema};

const ADMINISTRATIVE_GENDER: &[&str] = &["male", "female", "other", "unknown"];
const LINK_TYPE: &[&str] = &["replaced-by", "replaces", "refer", "seealso"];
const ITEM_TYPE: &[&str] = &[
    "group",
    "display",
    "boolean",
    "decimal",
    "integer",
    "date",
    "dateTime",
    "time",
    "string",
    "text",
    "url",
    "choice",
    "open-choice",
    "attachment",
    "reference",
    "quantity",
];

pub fn entries() -> SchemaResult<Vec<ShapeEntry>> {
    Ok(vec![
        patient_contact()?,
        patient_communication()?,
        patient_link()?,
        questionnaire_item()?,
    ])
}

fn patient_contact() -> SchemaResult<ShapeEntry> {
    let schema = Schema::backbone(vec![
        A::new("relationship", Complex("CodeableConcept")).array(),
        A::new("name", Complex("HumanName")),
        A::new("telecom", Complex("ContactPoint")).array(),
        A::new("address", Complex("Address")),
        A::new("gender", Primitive(P::Code)).with_enum(ADMINISTRATIVE_GENDER),
        A::new("organization", Reference).with_targets(&["Organization"]),
        A::new("period", Complex("Period")),
    ])?;
    Ok(ShapeEntry::new("PatientContact", ShapeKind::Backbone, schema))
}

fn patient_communication() -> SchemaResult<ShapeEntry> {
    let schema = Schema::backbone(vec![
        A::new("language", Complex("CodeableConcept")).required(),
        A::new("preferred", Primitive(P::Boolean)),
    ])?;
    Ok(ShapeEntry::new("PatientCommunication", ShapeKind::Backbone, schema))
}

fn patient_link() -> SchemaResult<ShapeEntry> {
    let schema = Schema::backbone(vec![
        A::new("other", Reference)
            .required()
            .with_targets(&["Patient", "RelatedPerson"]),
        A::new("type", Primitive(P::Code)).required().with_enum(LINK_TYPE),
    ])?;
    Ok(ShapeEntry::new("PatientLink", ShapeKind::Backbone, schema))
}

// Items nest into themselves; the walker's depth guard bounds the descent.
fn questionnaire_item() -> SchemaResult<ShapeEntry> {
    let schema = Schema::backbone(vec![
        A::new("linkId", Primitive(P::String)).required(),
        A::new("definition", Primitive(P::Uri)),
        A::new("code", Complex("Coding")).array(),
        A::new("prefix", Primitive(P::String)),
        A::new("text", Primitive(P::String)),
        A::new("type", Primitive(P::Code)).required().with_enum(ITEM_TYPE),
        A::new("required", Primitive(P::Boolean)),
        A::new("repeats", Primitive(P::Boolean)),
        A::new("readOnly", Primitive(P::Boolean)),
        A::new("maxLength", Primitive(P::Integer)),
        A::new("item", Backbone("QuestionnaireItem")).array(),
    ])?;
    Ok(ShapeEntry::new("QuestionnaireItem", ShapeKind::Backbone, schema))
}
