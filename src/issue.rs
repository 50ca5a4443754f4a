//! Diagnostic issues and validation outcomes
//!
//! The issue wire shape is stable and round-trips through JSON:
//! `{ "severity": ..., "code": ..., "diagnostics": ..., "details": { "text": ... } }`.
//! Issues are accumulated into a caller-owned `Vec<Issue>` threaded by
//! mutable reference through the whole recursion; insertion order is
//! significant and preserved.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Issue severity levels, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Configuration defects; traversal of the affected field stops
    Fatal,
    /// Structural violations and caller misuse
    Error,
    /// Conditions worth surfacing that do not fail conformance by themselves
    Warning,
    /// Informational messages
    Information,
}

/// Human-readable detail text carried alongside the diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDetails {
    pub text: String,
}

/// One detected violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub code: String,
    pub diagnostics: String,
    pub details: IssueDetails,
}

impl Issue {
    pub fn new(
        severity: Severity,
        code: impl Into<String>,
        diagnostics: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            code: code.into(),
            diagnostics: diagnostics.into(),
            details: IssueDetails {
                text: details.into(),
            },
        }
    }

    pub fn fatal(
        code: impl Into<String>,
        diagnostics: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Fatal, code, diagnostics, details)
    }

    pub fn error(
        code: impl Into<String>,
        diagnostics: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Error, code, diagnostics, details)
    }

    pub fn warning(
        code: impl Into<String>,
        diagnostics: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, code, diagnostics, details)
    }
}

/// Conformance verdict plus the accumulated issue list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    pub issues: Vec<Issue>,
}

impl Outcome {
    /// Derive a verdict from a finished issue list: valid means no issues at all.
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        Self {
            is_valid: issues.is_empty(),
            issues,
        }
    }

    /// Render the outcome as a conventional OperationOutcome-style document.
    ///
    /// A clean outcome yields a single informational issue, matching the
    /// ecosystem convention for "all ok" outcomes.
    pub fn to_operation_outcome(&self) -> Value {
        let issues: Vec<Value> = if self.issues.is_empty() {
            vec![json!({
                "severity": "information",
                "code": "informational",
                "diagnostics": "Validation successful",
                "details": { "text": "No issues detected" }
            })]
        } else {
            self.issues
                .iter()
                .map(|issue| serde_json::to_value(issue).unwrap_or(Value::Null))
                .collect()
        };

        json!({
            "resourceType": "OperationOutcome",
            "issue": issues,
        })
    }
}
