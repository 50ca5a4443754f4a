//! Shape validator orchestration
//!
//! The per-shape entry point: normalizes the instance, runs the structural
//! walker, then runs the shape's custom cross-field checks in declaration
//! order against the normalized instance. Also provides the reusable
//! constraint helpers the shipped catalog plugs into its entries.

use crate::issue::Issue;
use crate::primitive::type_name;
use crate::registry::{CustomCheck, Registry, ShapeEntry, ShapeKind};
use crate::walker::{empty_value, walk};
use serde_json::{Map, Value};

/// Validate one instance against one registered shape.
pub fn validate_shape(
    registry: &Registry,
    entry: &ShapeEntry,
    instance: &Value,
    path: &str,
    depth: usize,
    issues: &mut Vec<Issue>,
) {
    // Normalization strips null members before any structural check, so an
    // explicit null is never confused with "present but empty"
    let normalized: Map<String, Value> = match instance {
        Value::Object(members) => members
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        _ => {
            issues.push(Issue::error(
                "structure",
                format!(
                    "{path}: expected a {} structure, found {}",
                    entry.name,
                    type_name(instance)
                ),
                "Instance must be a structure",
            ));
            // Walk an empty instance anyway so required-field issues surface
            Map::new()
        }
    };

    if entry.kind == ShapeKind::Resource {
        if let Some(tag) = normalized.get("resourceType").and_then(Value::as_str) {
            if tag != entry.name {
                issues.push(Issue::error(
                    "invalid",
                    format!("{path}: resourceType '{tag}' does not match shape '{}'", entry.name),
                    "Resource type tag must match the validated shape",
                ));
            }
        }
    }

    walk(registry, &normalized, &entry.schema, path, depth, issues);

    let normalized = Value::Object(normalized);
    for check in &entry.checks {
        check(&normalized, path, issues);
    }
}

/// Cross-field check: `start` must not follow `end`. Operates on the ISO
/// lexical forms, which order correctly at equal precision.
pub fn starts_before_ends() -> CustomCheck {
    Box::new(|instance, path, issues| {
        let start = instance.get("start").and_then(Value::as_str);
        let end = instance.get("end").and_then(Value::as_str);
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                issues.push(Issue::error(
                    "invariant",
                    format!("{path}: start '{start}' must precede end '{end}'"),
                    "The interval start must precede its end",
                ));
            }
        }
    })
}

/// Cross-field check: a populated `value` requires a `unit` or `code`.
pub fn value_requires_unit() -> CustomCheck {
    Box::new(|instance, path, issues| {
        let has_value = instance.get("value").is_some_and(|v| !empty_value(v));
        let has_unit = instance.get("unit").is_some_and(|v| !empty_value(v))
            || instance.get("code").is_some_and(|v| !empty_value(v));
        if has_value && !has_unit {
            issues.push(Issue::error(
                "invariant",
                format!("{path}: a value requires a unit or coded unit"),
                "A quantity value must carry a unit",
            ));
        }
    })
}

/// Cross-field check: exactly one member of a choice group must be populated.
pub fn exactly_one_of(fields: &'static [&'static str], group: &'static str) -> CustomCheck {
    Box::new(move |instance, path, issues| {
        let populated = count_populated(instance, fields);
        if populated != 1 {
            issues.push(Issue::error(
                "invariant",
                format!(
                    "{path}: exactly one of {} must be populated for {group}, found {populated}",
                    fields.join(", ")
                ),
                "Choice group requires exactly one populated member",
            ));
        }
    })
}

/// Cross-field check: at most one member of a choice group may be populated.
pub fn at_most_one_of(fields: &'static [&'static str], group: &'static str) -> CustomCheck {
    Box::new(move |instance, path, issues| {
        let populated = count_populated(instance, fields);
        if populated > 1 {
            issues.push(Issue::error(
                "invariant",
                format!(
                    "{path}: at most one of {} may be populated for {group}, found {populated}",
                    fields.join(", ")
                ),
                "Choice group allows at most one populated member",
            ));
        }
    })
}

fn count_populated(instance: &Value, fields: &[&str]) -> usize {
    fields
        .iter()
        .filter(|field| instance.get(**field).is_some_and(|v| !empty_value(v)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationConfig;
    use crate::schema::{Attribute, DeclaredType, PrimitiveKind, Schema};
    use serde_json::json;

    fn interval_registry() -> Registry {
        let mut registry = Registry::new(ValidationConfig::default());
        let schema = Schema::element(vec![
            Attribute::new("start", DeclaredType::Primitive(PrimitiveKind::DateTime)),
            Attribute::new("end", DeclaredType::Primitive(PrimitiveKind::DateTime)),
        ])
        .unwrap();
        registry
            .insert(ShapeEntry::new("Interval", ShapeKind::Complex, schema).with_check(starts_before_ends()))
            .unwrap();
        registry
    }

    #[test]
    fn test_non_object_instance_still_walks_required() {
        let mut registry = Registry::new(ValidationConfig::default());
        let schema = Schema::element(vec![
            Attribute::new("status", DeclaredType::Primitive(PrimitiveKind::Code)).required(),
        ])
        .unwrap();
        registry
            .insert(ShapeEntry::new("Thing", ShapeKind::Complex, schema))
            .unwrap();

        let mut issues = Vec::new();
        registry.validate("Thing", &json!("not an object"), "Thing", &mut issues);
        let codes: Vec<&str> = issues.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["structure", "required"]);
    }

    #[test]
    fn test_null_members_are_normalized_away() {
        let registry = interval_registry();
        let mut issues = Vec::new();
        // Null is absent, not "present but empty"
        registry.validate("Interval", &json!({"start": null}), "Interval", &mut issues);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_custom_check_runs_after_walk() {
        let registry = interval_registry();
        let mut issues = Vec::new();
        let instance = json!({"start": "2020-01-01", "end": "2019-01-01"});
        registry.validate("Interval", &instance, "Interval", &mut issues);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "invariant");
        assert!(issues[0].diagnostics.contains("must precede"));
    }

    #[test]
    fn test_ordered_interval_is_clean() {
        let registry = interval_registry();
        let mut issues = Vec::new();
        let instance = json!({"start": "2019-01-01", "end": "2020-01-01"});
        registry.validate("Interval", &instance, "Interval", &mut issues);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_exactly_one_of() {
        let check = exactly_one_of(&["authorString", "authorReference"], "author[x]");
        let mut issues = Vec::new();
        check(&json!({"authorString": "me"}), "Note", &mut issues);
        assert!(issues.is_empty());

        check(&json!({}), "Note", &mut issues);
        assert_eq!(issues.len(), 1);

        issues.clear();
        check(
            &json!({"authorString": "me", "authorReference": {"reference": "Patient/1"}}),
            "Note",
            &mut issues,
        );
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_at_most_one_of() {
        let check = at_most_one_of(&["deceasedBoolean", "deceasedDateTime"], "deceased[x]");
        let mut issues = Vec::new();
        check(&json!({}), "Patient", &mut issues);
        check(&json!({"deceasedBoolean": true}), "Patient", &mut issues);
        assert!(issues.is_empty());

        check(
            &json!({"deceasedBoolean": false, "deceasedDateTime": "2020-01-01"}),
            "Patient",
            &mut issues,
        );
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_value_requires_unit() {
        let check = value_requires_unit();
        let mut issues = Vec::new();
        check(&json!({"value": 5.0, "unit": "d"}), "Duration", &mut issues);
        check(&json!({"value": 5.0, "code": "d"}), "Duration", &mut issues);
        assert!(issues.is_empty());

        check(&json!({"value": 5.0}), "Duration", &mut issues);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].diagnostics.contains("unit"));
    }
}
