//! Composite datatype shapes
//!
//! Every schema here is built with [`Schema::element`] except Dosage, which
//! carries modifier extensions and therefore uses the backbone suffix.

use crate::error::SchemaResult;
use crate::registry::{ShapeEntry, ShapeKind};
use crate::schema::{Attribute as A, DeclaredType::*, PrimitiveKind as P, Schema};
use crate::validator::{at_most_one_of, starts_before_ends, value_requires_unit};

const IDENTIFIER_USE: &[&str] = &["usual", "official", "temp", "secondary", "old"];
const NAME_USE: &[&str] = &["usual", "official", "temp", "nickname", "anonymous", "old", "maiden"];
const ADDRESS_USE: &[&str] = &["home", "work", "temp", "old", "billing"];
const ADDRESS_TYPE: &[&str] = &["postal", "physical", "both"];
const CONTACT_POINT_SYSTEM: &[&str] = &["phone", "fax", "email", "pager", "url", "sms", "other"];
const CONTACT_POINT_USE: &[&str] = &["home", "work", "temp", "old", "mobile"];
const QUANTITY_COMPARATOR: &[&str] = &["<", "<=", ">=", ">"];
const NARRATIVE_STATUS: &[&str] = &["generated", "extensions", "additional", "empty"];

const EXTENSION_VALUE_FIELDS: &[&str] = &[
    "valueBoolean",
    "valueCode",
    "valueDate",
    "valueDateTime",
    "valueDecimal",
    "valueInteger",
    "valueString",
    "valueUri",
    "valueCoding",
    "valueCodeableConcept",
    "valueQuantity",
    "valuePeriod",
    "valueReference",
    "valueIdentifier",
];

const ANNOTATION_AUTHOR_FIELDS: &[&str] = &["authorReference", "authorString"];

pub fn entries() -> SchemaResult<Vec<ShapeEntry>> {
    Ok(vec![
        coding()?,
        codeable_concept()?,
        period()?,
        identifier()?,
        reference()?,
        human_name()?,
        address()?,
        contact_point()?,
        quantity()?,
        duration()?,
        annotation()?,
        attachment()?,
        extension()?,
        meta()?,
        narrative()?,
        dosage()?,
    ])
}

fn coding() -> SchemaResult<ShapeEntry> {
    let schema = Schema::element(vec![
        A::new("system", Primitive(P::Uri)),
        A::new("version", Primitive(P::String)),
        A::new("code", Primitive(P::Code)),
        A::new("display", Primitive(P::String)),
        A::new("userSelected", Primitive(P::Boolean)),
    ])?;
    Ok(ShapeEntry::new("Coding", ShapeKind::Complex, schema))
}

fn codeable_concept() -> SchemaResult<ShapeEntry> {
    let schema = Schema::element(vec![
        A::new("coding", Complex("Coding")).array(),
        A::new("text", Primitive(P::String)),
    ])?;
    Ok(ShapeEntry::new("CodeableConcept", ShapeKind::Complex, schema))
}

fn period() -> SchemaResult<ShapeEntry> {
    let schema = Schema::element(vec![
        A::new("start", Primitive(P::DateTime)),
        A::new("end", Primitive(P::DateTime)),
    ])?;
    Ok(ShapeEntry::new("Period", ShapeKind::Complex, schema).with_check(starts_before_ends()))
}

fn identifier() -> SchemaResult<ShapeEntry> {
    let schema = Schema::element(vec![
        A::new("use", Primitive(P::Code)).with_enum(IDENTIFIER_USE),
        A::new("type", Complex("CodeableConcept")),
        A::new("system", Primitive(P::Uri)),
        A::new("value", Primitive(P::String)),
        A::new("period", Complex("Period")),
        A::new("assigner", Reference).with_targets(&["Organization"]),
    ])?;
    Ok(ShapeEntry::new("Identifier", ShapeKind::Complex, schema))
}

fn reference() -> SchemaResult<ShapeEntry> {
    let schema = Schema::element(vec![
        A::new("reference", Primitive(P::String)),
        A::new("type", Primitive(P::Uri)),
        A::new("identifier", Complex("Identifier")),
        A::new("display", Primitive(P::String)),
    ])?;
    Ok(ShapeEntry::new("Reference", ShapeKind::Complex, schema))
}

fn human_name() -> SchemaResult<ShapeEntry> {
    let schema = Schema::element(vec![
        A::new("use", Primitive(P::Code)).with_enum(NAME_USE),
        A::new("text", Primitive(P::String)),
        A::new("family", Primitive(P::String)),
        A::new("given", Primitive(P::String)).array(),
        A::new("prefix", Primitive(P::String)).array(),
        A::new("suffix", Primitive(P::String)).array(),
        A::new("period", Complex("Period")),
    ])?;
    Ok(ShapeEntry::new("HumanName", ShapeKind::Complex, schema))
}

fn address() -> SchemaResult<ShapeEntry> {
    let schema = Schema::element(vec![
        A::new("use", Primitive(P::Code)).with_enum(ADDRESS_USE),
        A::new("type", Primitive(P::Code)).with_enum(ADDRESS_TYPE),
        A::new("text", Primitive(P::String)),
        A::new("line", Primitive(P::String)).array(),
        A::new("city", Primitive(P::String)),
        A::new("district", Primitive(P::String)),
        A::new("state", Primitive(P::String)),
        A::new("postalCode", Primitive(P::String)),
        A::new("country", Primitive(P::String)),
        A::new("period", Complex("Period")),
    ])?;
    Ok(ShapeEntry::new("Address", ShapeKind::Complex, schema))
}

fn contact_point() -> SchemaResult<ShapeEntry> {
    let schema = Schema::element(vec![
        A::new("system", Primitive(P::Code)).with_enum(CONTACT_POINT_SYSTEM),
        A::new("value", Primitive(P::String)),
        A::new("use", Primitive(P::Code)).with_enum(CONTACT_POINT_USE),
        A::new("rank", Primitive(P::PositiveInt)),
        A::new("period", Complex("Period")),
    ])?;
    Ok(ShapeEntry::new("ContactPoint", ShapeKind::Complex, schema))
}

fn quantity_fields() -> Vec<A> {
    vec![
        A::new("value", Primitive(P::Decimal)),
        A::new("comparator", Primitive(P::Code)).with_enum(QUANTITY_COMPARATOR),
        A::new("unit", Primitive(P::String)),
        A::new("system", Primitive(P::Uri)),
        A::new("code", Primitive(P::Code)),
    ]
}

fn quantity() -> SchemaResult<ShapeEntry> {
    let schema = Schema::element(quantity_fields())?;
    Ok(ShapeEntry::new("Quantity", ShapeKind::Complex, schema))
}

fn duration() -> SchemaResult<ShapeEntry> {
    let schema = Schema::element(quantity_fields())?;
    Ok(ShapeEntry::new("Duration", ShapeKind::Complex, schema).with_check(value_requires_unit()))
}

fn annotation() -> SchemaResult<ShapeEntry> {
    let schema = Schema::element(vec![
        A::new("authorReference", Reference)
            .with_targets(&["Practitioner", "Patient", "RelatedPerson", "Organization"]),
        A::new("authorString", Primitive(P::String)),
        A::new("time", Primitive(P::DateTime)),
        A::new("text", Primitive(P::Markdown)).required(),
    ])?;
    Ok(ShapeEntry::new("Annotation", ShapeKind::Complex, schema)
        .with_check(at_most_one_of(ANNOTATION_AUTHOR_FIELDS, "author[x]")))
}

fn attachment() -> SchemaResult<ShapeEntry> {
    let schema = Schema::element(vec![
        A::new("contentType", Primitive(P::Code)),
        A::new("language", Primitive(P::Code)),
        A::new("data", Primitive(P::Base64Binary)),
        A::new("url", Primitive(P::Url)),
        A::new("size", Primitive(P::UnsignedInt)),
        A::new("hash", Primitive(P::Base64Binary)),
        A::new("title", Primitive(P::String)),
        A::new("creation", Primitive(P::DateTime)),
    ])?;
    Ok(ShapeEntry::new("Attachment", ShapeKind::Complex, schema))
}

fn extension() -> SchemaResult<ShapeEntry> {
    let schema = Schema::element(vec![
        A::new("url", Primitive(P::Uri)).required(),
        A::new("valueBoolean", Primitive(P::Boolean)),
        A::new("valueCode", Primitive(P::Code)),
        A::new("valueDate", Primitive(P::Date)),
        A::new("valueDateTime", Primitive(P::DateTime)),
        A::new("valueDecimal", Primitive(P::Decimal)),
        A::new("valueInteger", Primitive(P::Integer)),
        A::new("valueString", Primitive(P::String)),
        A::new("valueUri", Primitive(P::Uri)),
        A::new("valueCoding", Complex("Coding")),
        A::new("valueCodeableConcept", Complex("CodeableConcept")),
        A::new("valueQuantity", Complex("Quantity")),
        A::new("valuePeriod", Complex("Period")),
        A::new("valueReference", Reference).with_targets(&["Any"]),
        A::new("valueIdentifier", Complex("Identifier")),
    ])?;
    Ok(ShapeEntry::new("Extension", ShapeKind::Complex, schema)
        .with_check(at_most_one_of(EXTENSION_VALUE_FIELDS, "value[x]")))
}

fn meta() -> SchemaResult<ShapeEntry> {
    let schema = Schema::element(vec![
        A::new("versionId", Primitive(P::Id)),
        A::new("lastUpdated", Primitive(P::Instant)),
        A::new("source", Primitive(P::Uri)),
        A::new("profile", Primitive(P::Canonical)).array(),
        A::new("security", Complex("Coding")).array(),
        A::new("tag", Complex("Coding")).array(),
    ])?;
    Ok(ShapeEntry::new("Meta", ShapeKind::Complex, schema))
}

fn narrative() -> SchemaResult<ShapeEntry> {
    let schema = Schema::element(vec![
        A::new("status", Primitive(P::Code)).required().with_enum(NARRATIVE_STATUS),
        A::new("div", Primitive(P::Xhtml)).required(),
    ])?;
    Ok(ShapeEntry::new("Narrative", ShapeKind::Complex, schema))
}

// Dosage is a datatype that carries modifier extensions, so its schema is
// built with the backbone suffix; its registry resolution goes through the
// explicit override in Registry::resolve.
fn dosage() -> SchemaResult<ShapeEntry> {
    let schema = Schema::backbone(vec![
        A::new("sequence", Primitive(P::Integer)),
        A::new("text", Primitive(P::String)),
        A::new("patientInstruction", Primitive(P::String)),
        A::new("asNeededBoolean", Primitive(P::Boolean)),
        A::new("site", Complex("CodeableConcept")),
        A::new("route", Complex("CodeableConcept")),
        A::new("method", Complex("CodeableConcept")),
        A::new("maxDosePerAdministration", Complex("Quantity")),
    ])?;
    Ok(ShapeEntry::new("Dosage", ShapeKind::Complex, schema))
}
