//! Reference format validation
//!
//! Parses the `reference` string of a reference value to extract an embedded
//! resource-type token and checks it against the attribute's declared
//! allowed-target set. Checking is opt-in per field: with no declared
//! targets, no reference string, or a fragment/urn/absolute-URL reference,
//! nothing is checked.

use crate::catalog::RESOURCE_TYPES;
use crate::issue::Issue;
use serde_json::Value;

/// Qualifier keys legal in the query form of a reference string
const REFERENCE_QUERY_KEYS: &[&str] = &[
    "reference",
    "type",
    "identifier",
    "display",
    "_display",
    "_reference",
    "_type",
];

/// Prefixes that mark a reference as out of scope for target checking:
/// contained fragments, urns, and absolute URLs.
const UNCHECKED_PREFIXES: &[&str] = &["#", "urn:", "http://", "https://"];

/// Validate a reference value (or array of them) against the allowed targets.
pub fn check_reference(
    value: &Value,
    allowed_targets: Option<&[&str]>,
    path: &str,
    issues: &mut Vec<Issue>,
) {
    let Some(targets) = allowed_targets else {
        return;
    };

    match value {
        Value::Array(elements) => {
            for (index, element) in elements.iter().enumerate() {
                check_scalar(element, targets, &format!("{path}[{index}]"), issues);
            }
        }
        _ => check_scalar(value, targets, path, issues),
    }
}

fn check_scalar(value: &Value, targets: &[&str], path: &str, issues: &mut Vec<Issue>) {
    let Some(reference) = value.get("reference").and_then(Value::as_str) else {
        return;
    };

    if UNCHECKED_PREFIXES.iter().any(|p| reference.starts_with(p)) {
        return;
    }

    if let Some((type_token, query)) = reference.split_once('?') {
        check_target(type_token, targets, reference, path, issues);

        let pairs: Vec<&str> = query.split('&').collect();
        if pairs.len() != 1 {
            issues.push(Issue::error(
                "value",
                format!("{path}: reference query '{reference}' must contain exactly one key=value pair"),
                "Reference queries carry a single qualifier pair",
            ));
            return;
        }
        match pairs[0].split_once('=') {
            Some((key, _)) if REFERENCE_QUERY_KEYS.contains(&key) => {}
            Some((key, _)) => issues.push(Issue::error(
                "value",
                format!("{path}: '{key}' is not a valid reference qualifier key"),
                "Reference qualifier keys are limited to a fixed whitelist",
            )),
            None => issues.push(Issue::error(
                "value",
                format!("{path}: reference query '{reference}' is missing a key=value pair"),
                "Reference queries carry a single qualifier pair",
            )),
        }
    } else if let Some((type_token, id)) = reference.split_once('/') {
        // Without an id segment there is nothing to conform against
        if !id.is_empty() {
            check_target(type_token, targets, reference, path, issues);
        }
    }
    // No '/' and no '?': contained fragment or opaque token, not validated
}

fn check_target(
    type_token: &str,
    targets: &[&str],
    reference: &str,
    path: &str,
    issues: &mut Vec<Issue>,
) {
    let allowed = if targets.contains(&"Any") {
        RESOURCE_TYPES.contains(&type_token)
    } else {
        targets.contains(&type_token)
    };

    if !allowed {
        issues.push(Issue::error(
            "value",
            format!(
                "{path}: reference '{reference}' points at '{type_token}', expected one of: {}",
                targets.join(", ")
            ),
            "Reference target is not in the allowed target set",
        ));
    }
}
