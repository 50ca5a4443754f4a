//! The structural walker
//!
//! Given a normalized instance and its schema, performs every applicable
//! check and recurses into nested shapes through the registry. Checks never
//! short-circuit: unknown fields, missing required fields, and every
//! per-present-field violation all contribute issues independently, in a
//! fixed order (unknown fields first, then required fields in schema order,
//! then per-field checks in the instance's own key order).

use crate::issue::Issue;
use crate::primitive::type_name;
use crate::reference::check_reference;
use crate::registry::Registry;
use crate::schema::{Attribute, DeclaredType, Schema};
use serde_json::{Map, Value};
use tracing::trace;

/// Walk one instance against one schema, appending issues.
pub fn walk(
    registry: &Registry,
    instance: &Map<String, Value>,
    schema: &Schema,
    path: &str,
    depth: usize,
    issues: &mut Vec<Issue>,
) {
    // Unknown fields, reported together in one issue
    let unknown: Vec<&str> = instance
        .keys()
        .filter(|key| schema.get(key).is_none())
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        issues.push(Issue::error(
            "structure",
            format!("{path} contains unknown attribute(s): {}", unknown.join(", ")),
            "Attributes must be declared in the shape's schema",
        ));
    }

    // Required fields, in schema declaration order
    for attribute in schema.attributes() {
        if !attribute.required {
            continue;
        }
        let present = instance
            .get(attribute.name)
            .is_some_and(|value| !empty_value(value));
        if !present {
            issues.push(Issue::error(
                "required",
                format!("{path}.{} is required but absent or empty", attribute.name),
                "Required attribute is missing",
            ));
        }
    }

    // Per-present-field checks, in instance key order
    for (key, value) in instance {
        let Some(attribute) = schema.get(key) else {
            continue;
        };
        let field_path = format!("{path}.{key}");
        trace!(field = %field_path, "checking attribute");

        // Polymorphic embedding dispatches by the value's own type tag and
        // skips the remaining per-field checks
        if attribute.declared_type == DeclaredType::AnyResource {
            if let Value::Array(elements) = value {
                for (index, element) in elements.iter().enumerate() {
                    dispatch_embedded(registry, element, &format!("{field_path}[{index}]"), depth, issues);
                }
            } else if attribute.array {
                push_array_issue(attribute, value, &field_path, issues);
            } else {
                dispatch_embedded(registry, value, &field_path, depth, issues);
            }
            continue;
        }

        if attribute.declared_type == DeclaredType::Reference {
            check_reference(value, attribute.reference_targets, &field_path, issues);
        }

        if empty_value(value) {
            issues.push(Issue::error(
                "invalid",
                format!("{field_path} must carry a value or children"),
                "Every element must carry a value or children",
            ));
        }

        if !attribute.array {
            if let Some(values) = attribute.enum_values {
                check_enum(value, attribute, values, &field_path, issues);
            }
        }

        if attribute.array {
            match value {
                Value::Array(elements) => {
                    for (index, element) in elements.iter().enumerate() {
                        descend(registry, attribute, element, &format!("{field_path}[{index}]"), depth, issues);
                    }
                }
                // Wrong cardinality: report once, no per-element recursion
                _ => push_array_issue(attribute, value, &field_path, issues),
            }
        } else {
            descend(registry, attribute, value, &field_path, depth, issues);
        }
    }
}

/// Typed empty predicate: a value is absent when it is null, a blank string,
/// an empty sequence, or a structure with no populated members.
pub fn empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(elements) => elements.is_empty(),
        Value::Object(members) => members.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn push_array_issue(attribute: &Attribute, value: &Value, path: &str, issues: &mut Vec<Issue>) {
    issues.push(Issue::error(
        "structure",
        format!(
            "{path}: expected an array of {}, found {}",
            attribute.declared_type.name(),
            type_name(value)
        ),
        "Attribute is declared with array cardinality",
    ));
}

/// Enumeration membership. Coded composites are checked per embedded code at
/// an indexed path; bare scalar codes are checked directly.
fn check_enum(
    value: &Value,
    attribute: &Attribute,
    allowed: &[&str],
    path: &str,
    issues: &mut Vec<Issue>,
) {
    match attribute.declared_type {
        DeclaredType::Complex("CodeableConcept") => {
            let Some(codings) = value.get("coding").and_then(Value::as_array) else {
                return;
            };
            for (index, coding) in codings.iter().enumerate() {
                if let Some(code) = coding.get("code").and_then(Value::as_str) {
                    if !allowed.contains(&code) {
                        issues.push(Issue::error(
                            "code-invalid",
                            format!(
                                "{path}.coding[{index}].code: '{code}' is not in the value set ({})",
                                allowed.join(", ")
                            ),
                            "Code is not a member of the bound value set",
                        ));
                    }
                }
            }
        }
        _ => {
            if let Some(code) = value.as_str() {
                if !allowed.contains(&code) {
                    issues.push(Issue::error(
                        "code-invalid",
                        format!("{path}: '{code}' is not in the value set ({})", allowed.join(", ")),
                        "Code is not a member of the bound value set",
                    ));
                }
            }
        }
    }
}

/// Recursive descent into one element value by its declared type.
fn descend(
    registry: &Registry,
    attribute: &Attribute,
    value: &Value,
    path: &str,
    depth: usize,
    issues: &mut Vec<Issue>,
) {
    match attribute.declared_type {
        DeclaredType::Primitive(kind) => {
            registry.primitives().check(kind, value, path, issues);
        }
        DeclaredType::Complex(name) | DeclaredType::Backbone(name) | DeclaredType::Resource(name) => {
            descend_named(registry, name, value, path, depth, issues);
        }
        DeclaredType::Reference => {
            descend_named(registry, "Reference", value, path, depth, issues);
        }
        // Handled before descent
        DeclaredType::AnyResource => {}
    }
}

fn descend_named(
    registry: &Registry,
    name: &str,
    value: &Value,
    path: &str,
    depth: usize,
    issues: &mut Vec<Issue>,
) {
    if depth >= registry.config().max_depth {
        issues.push(Issue::fatal(
            "too-deep",
            format!("{path}: nesting exceeds the maximum depth of {}", registry.config().max_depth),
            "Recursion depth guard reached; deeper content was not validated",
        ));
        return;
    }
    match registry.resolve(name) {
        Some(entry) => {
            crate::validator::validate_shape(registry, entry, value, path, depth + 1, issues);
        }
        // Missing registry entry is a configuration defect, not a crash
        None => issues.push(Issue::fatal(
            "not-supported",
            format!("{path}: no validator registered for type '{name}'"),
            "Missing dispatch registry entry",
        )),
    }
}

/// Dispatch a polymorphically embedded resource by its own resourceType tag.
fn dispatch_embedded(
    registry: &Registry,
    value: &Value,
    path: &str,
    depth: usize,
    issues: &mut Vec<Issue>,
) {
    let Some(tag) = value.get("resourceType").and_then(Value::as_str) else {
        issues.push(Issue::error(
            "structure",
            format!("{path}: embedded resource carries no resourceType tag"),
            "Embedded resources must declare their own type",
        ));
        return;
    };
    descend_named(registry, tag, value, path, depth, issues);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::schema::{Attribute, PrimitiveKind, Schema};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn test_schema() -> Schema {
        Schema::element(vec![
            Attribute::new("status", DeclaredType::Primitive(PrimitiveKind::Code))
                .required()
                .with_enum(&["active", "inactive"]),
            Attribute::new("note", DeclaredType::Primitive(PrimitiveKind::String)),
            Attribute::new("tag", DeclaredType::Complex("Coding")).array(),
        ])
        .unwrap()
    }

    #[test]
    fn test_unknown_fields_reported_together() {
        let registry = Registry::builtin();
        let mut issues = Vec::new();
        let instance = as_map(json!({"status": "active", "bogus": 1, "extra": 2}));
        walk(registry, &instance, &test_schema(), "Test", 0, &mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "structure");
        assert!(issues[0].diagnostics.contains("bogus, extra"));
    }

    #[test]
    fn test_required_field_missing() {
        let registry = Registry::builtin();
        let mut issues = Vec::new();
        let instance = as_map(json!({"note": "hello"}));
        walk(registry, &instance, &test_schema(), "Test", 0, &mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "required");
        assert!(issues[0].diagnostics.contains("Test.status"));
    }

    #[test]
    fn test_required_field_empty_counts_as_missing() {
        let registry = Registry::builtin();
        let mut issues = Vec::new();
        let instance = as_map(json!({"status": "  "}));
        walk(registry, &instance, &test_schema(), "Test", 0, &mut issues);
        assert!(issues.iter().any(|i| i.code == "required"));
    }

    #[test]
    fn test_enum_membership() {
        let registry = Registry::builtin();
        let mut issues = Vec::new();
        let instance = as_map(json!({"status": "bogus"}));
        walk(registry, &instance, &test_schema(), "Test", 0, &mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "code-invalid");
        assert!(issues[0].diagnostics.contains("'bogus'"));

        issues.clear();
        let instance = as_map(json!({"status": "active"}));
        walk(registry, &instance, &test_schema(), "Test", 0, &mut issues);
        assert_eq!(issues, vec![]);
    }

    #[test]
    fn test_coded_composite_enum_indexed_path() {
        let schema = Schema::element(vec![
            Attribute::new("severity", DeclaredType::Complex("CodeableConcept"))
                .with_enum(&["mild", "moderate", "severe"]),
        ])
        .unwrap();
        let registry = Registry::builtin();
        let mut issues = Vec::new();
        let instance = as_map(json!({"severity": {"coding": [{"code": "bogus"}]}}));
        walk(registry, &instance, &schema, "Test", 0, &mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "code-invalid");
        assert!(issues[0].diagnostics.contains("Test.severity.coding[0].code"));
    }

    #[test]
    fn test_array_cardinality_no_recursion() {
        let registry = Registry::builtin();
        let mut issues = Vec::new();
        // Scalar object where an array of Coding is declared: exactly one
        // issue, and no descent into the bad value's fields
        let instance = as_map(json!({"status": "active", "tag": {"system": 5, "code": 7}}));
        walk(registry, &instance, &test_schema(), "Test", 0, &mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "structure");
        assert!(issues[0].diagnostics.contains("expected an array"));
    }

    #[test]
    fn test_array_elements_descend_with_index() {
        let registry = Registry::builtin();
        let mut issues = Vec::new();
        let instance = as_map(json!({"status": "active", "tag": [{"code": 42}]}));
        walk(registry, &instance, &test_schema(), "Test", 0, &mut issues);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].diagnostics.contains("Test.tag[0].code"));
    }

    #[test]
    fn test_empty_value_issue() {
        let registry = Registry::builtin();
        let mut issues = Vec::new();
        let instance = as_map(json!({"status": "active", "note": ""}));
        walk(registry, &instance, &test_schema(), "Test", 0, &mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "invalid");
        assert!(issues[0].details.text.contains("value or children"));
    }

    #[test]
    fn test_issue_ordering_is_fixed() {
        let registry = Registry::builtin();
        let mut issues = Vec::new();
        // Unknown field + missing required + bad present field, in one walk
        let instance = as_map(json!({"bogus": 1, "note": ""}));
        walk(registry, &instance, &test_schema(), "Test", 0, &mut issues);
        let codes: Vec<&str> = issues.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["structure", "required", "invalid"]);
    }

    #[test]
    fn test_missing_registry_entry_is_fatal_issue() {
        let schema = Schema::element(vec![Attribute::new(
            "widget",
            DeclaredType::Complex("NoSuchShape"),
        )])
        .unwrap();
        let registry = Registry::builtin();
        let mut issues = Vec::new();
        let instance = as_map(json!({"widget": {"x": 1}}));
        walk(registry, &instance, &schema, "Test", 0, &mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, crate::Severity::Fatal);
        assert_eq!(issues[0].code, "not-supported");
        assert!(issues[0].diagnostics.contains("NoSuchShape"));
    }

    #[test]
    fn test_empty_value_predicate() {
        assert!(empty_value(&json!(null)));
        assert!(empty_value(&json!("")));
        assert!(empty_value(&json!("   ")));
        assert!(empty_value(&json!([])));
        assert!(empty_value(&json!({})));
        assert!(!empty_value(&json!(false)));
        assert!(!empty_value(&json!(0)));
        assert!(!empty_value(&json!("x")));
        assert!(!empty_value(&json!([1])));
        assert!(!empty_value(&json!({"a": 1})));
    }

    #[test]
    fn test_embedded_resource_without_tag() {
        let schema = Schema::element(vec![
            Attribute::new("payload", DeclaredType::AnyResource),
        ])
        .unwrap();
        let registry = Registry::builtin();
        let mut issues = Vec::new();
        let instance = as_map(json!({"payload": {"id": "x"}}));
        walk(registry, &instance, &schema, "Test", 0, &mut issues);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].diagnostics.contains("resourceType"));
    }
}
