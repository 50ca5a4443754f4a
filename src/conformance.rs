//! The public conformance entry point

use crate::issue::{Issue, Outcome};
use crate::registry::Registry;
use serde_json::Value;
use tracing::debug;

/// Validate an instance as the named shape and return a verdict plus the
/// accumulated issues. Never raises: an unresolvable shape name becomes a
/// fatal issue in the outcome.
pub fn conform(registry: &Registry, shape_name: &str, instance: &Value) -> Outcome {
    debug!(shape = shape_name, "validating instance");
    let mut issues = Vec::new();
    match registry.resolve(shape_name) {
        Some(entry) => {
            crate::validator::validate_shape(registry, entry, instance, shape_name, 0, &mut issues);
        }
        None => issues.push(Issue::fatal(
            "not-supported",
            format!("no validator registered for shape '{shape_name}'"),
            "Missing dispatch registry entry",
        )),
    }
    debug!(shape = shape_name, issues = issues.len(), "validation finished");
    Outcome::from_issues(issues)
}

/// [`conform`] against the builtin shape catalog.
pub fn conform_default(shape_name: &str, instance: &Value) -> Outcome {
    conform(Registry::builtin(), shape_name, instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_shape_is_fatal_outcome() {
        let outcome = conform_default("NoSuchShape", &json!({}));
        assert!(!outcome.is_valid);
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].code, "not-supported");
        assert_eq!(outcome.issues[0].severity, crate::Severity::Fatal);
    }

    #[test]
    fn test_minimal_patient_is_valid() {
        let outcome = conform_default("Patient", &json!({"resourceType": "Patient"}));
        assert!(outcome.is_valid);
        assert!(outcome.issues.is_empty());
    }
}
