//! Primitive value checking
//!
//! Validates scalar lexical forms against the fixed grammars of the
//! interchange specification. Every checker appends issues and returns; no
//! lexical failure ever aborts the walk, so one invalid field never
//! suppresses diagnostics for its siblings.

use crate::issue::Issue;
use crate::schema::PrimitiveKind;
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde_json::Value;

/// Signed 32-bit bounds for the integer kind
const INT_MIN: i64 = i32::MIN as i64;
const INT_MAX: i64 = i32::MAX as i64;
/// Unsigned 32-bit upper bound for unsignedInt/positiveInt
const UINT_MAX: i64 = u32::MAX as i64;

/// Primitive validator with compiled lexical grammars
pub struct PrimitiveValidator {
    id_regex: Regex,
    code_regex: Regex,
    oid_regex: Regex,
    uuid_regex: Regex,
    base64_regex: Regex,
    uri_regex: Regex,
    date_regex: Regex,
    datetime_regex: Regex,
    time_regex: Regex,
}

impl PrimitiveValidator {
    pub fn new() -> Self {
        Self {
            // ID pattern: [A-Za-z0-9\-\.]{1,64}
            id_regex: Regex::new(r"^[A-Za-z0-9\-\.]{1,64}$").unwrap(),
            // Code pattern: no leading/trailing whitespace, single internal spaces
            code_regex: Regex::new(r"^[^\s]+(\s[^\s]+)*$").unwrap(),
            // OID pattern: urn:oid:[0-2](\.(0|[1-9][0-9]*))+
            oid_regex: Regex::new(r"^urn:oid:[0-2](\.(0|[1-9][0-9]*))+$").unwrap(),
            // UUID pattern: urn:uuid: plus the 8-4-4-4-12 hex form
            uuid_regex: Regex::new(
                r"^urn:uuid:[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$",
            )
            .unwrap(),
            base64_regex: Regex::new(r"^[A-Za-z0-9+/\s]*={0,2}$").unwrap(),
            // URIs may be relative; the grammar only forbids whitespace
            uri_regex: Regex::new(r"^\S+$").unwrap(),
            // Calendar date with optional month/day precision
            date_regex: Regex::new(
                r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1]))?)?$",
            )
            .unwrap(),
            // Date with optional time; a populated time requires a timezone
            datetime_regex: Regex::new(
                r"^([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)(-(0[1-9]|1[0-2])(-(0[1-9]|[1-2][0-9]|3[0-1])(T([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00)))?)?)?$",
            )
            .unwrap(),
            time_regex: Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?$")
                .unwrap(),
        }
    }

    /// Validate one scalar value against its declared lexical kind.
    pub fn check(&self, kind: PrimitiveKind, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        match kind {
            PrimitiveKind::Boolean => self.check_boolean(value, path, issues),
            PrimitiveKind::Integer => self.check_integer(value, path, issues),
            PrimitiveKind::UnsignedInt => self.check_unsigned_int(value, path, issues),
            PrimitiveKind::PositiveInt => self.check_positive_int(value, path, issues),
            PrimitiveKind::Decimal => self.check_decimal(value, path, issues),
            PrimitiveKind::String | PrimitiveKind::Markdown | PrimitiveKind::Xhtml => {
                self.check_string(kind, value, path, issues)
            }
            PrimitiveKind::Code => self.check_code(value, path, issues),
            PrimitiveKind::Id => self.check_id(value, path, issues),
            PrimitiveKind::Base64Binary => self.check_base64(value, path, issues),
            PrimitiveKind::Uri | PrimitiveKind::Canonical => self.check_uri(kind, value, path, issues),
            PrimitiveKind::Url => self.check_url(value, path, issues),
            PrimitiveKind::Oid => self.check_oid(value, path, issues),
            PrimitiveKind::Uuid => self.check_uuid(value, path, issues),
            PrimitiveKind::Date => self.check_date(value, path, issues),
            PrimitiveKind::DateTime => self.check_datetime(value, path, issues),
            PrimitiveKind::Instant => self.check_instant(value, path, issues),
            PrimitiveKind::Time => self.check_time(value, path, issues),
        }
    }

    fn check_boolean(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        if !value.is_boolean() {
            issues.push(Issue::error(
                "value",
                format!("{path}: expected a boolean, found {}", type_name(value)),
                "Value must be a boolean",
            ));
        }
    }

    fn check_integer(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        match value.as_i64() {
            Some(n) if (INT_MIN..=INT_MAX).contains(&n) => {}
            Some(n) => issues.push(Issue::error(
                "value",
                format!("{path}: integer {n} is outside the signed 32-bit range"),
                "Value must be a signed 32-bit integer",
            )),
            None => issues.push(Issue::error(
                "value",
                format!("{path}: expected an integer, found {}", type_name(value)),
                "Value must be a signed 32-bit integer",
            )),
        }
    }

    fn check_unsigned_int(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        match value.as_i64() {
            Some(n) if (0..=UINT_MAX).contains(&n) => {}
            Some(n) => issues.push(Issue::error(
                "value",
                format!("{path}: {n} is not a valid unsignedInt"),
                "Value must be an unsigned 32-bit integer",
            )),
            None => issues.push(Issue::error(
                "value",
                format!("{path}: expected an unsigned integer, found {}", type_name(value)),
                "Value must be an unsigned 32-bit integer",
            )),
        }
    }

    fn check_positive_int(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        match value.as_i64() {
            Some(n) if (1..=UINT_MAX).contains(&n) => {}
            Some(n) => issues.push(Issue::error(
                "value",
                format!("{path}: {n} is not a valid positiveInt"),
                "Value must be a positive 32-bit integer",
            )),
            None => issues.push(Issue::error(
                "value",
                format!("{path}: expected a positive integer, found {}", type_name(value)),
                "Value must be a positive 32-bit integer",
            )),
        }
    }

    fn check_decimal(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        if !value.is_number() {
            issues.push(Issue::error(
                "value",
                format!("{path}: expected a decimal number, found {}", type_name(value)),
                "Value must be a decimal number",
            ));
        }
    }

    fn check_string(&self, kind: PrimitiveKind, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        if !value.is_string() {
            issues.push(Issue::error(
                "value",
                format!(
                    "{path}: expected a {} string, found {}",
                    kind.name(),
                    type_name(value)
                ),
                "Value must be a string",
            ));
        }
    }

    fn check_code(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        match value.as_str() {
            Some(s) if self.code_regex.is_match(s) => {}
            Some(s) => issues.push(Issue::error(
                "value",
                format!("{path}: '{s}' is not a valid code"),
                "Codes must not carry leading, trailing, or doubled whitespace",
            )),
            None => issues.push(Issue::error(
                "value",
                format!("{path}: expected a code string, found {}", type_name(value)),
                "Value must be a string representing a code",
            )),
        }
    }

    fn check_id(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        match value.as_str() {
            Some(s) if self.id_regex.is_match(s) => {}
            Some(s) => issues.push(Issue::error(
                "value",
                format!("{path}: '{s}' is not a valid id"),
                "Ids are 1-64 characters of letters, digits, '-' and '.'",
            )),
            None => issues.push(Issue::error(
                "value",
                format!("{path}: expected an id string, found {}", type_name(value)),
                "Value must be a string representing an id",
            )),
        }
    }

    fn check_base64(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        match value.as_str() {
            Some(s) if self.base64_regex.is_match(s) => {}
            Some(_) => issues.push(Issue::error(
                "value",
                format!("{path}: value is not valid base64 content"),
                "Value must be base64-encoded content",
            )),
            None => issues.push(Issue::error(
                "value",
                format!("{path}: expected a base64 string, found {}", type_name(value)),
                "Value must be a string of base64-encoded content",
            )),
        }
    }

    fn check_uri(&self, kind: PrimitiveKind, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        match value.as_str() {
            Some(s) if self.uri_regex.is_match(s) => {}
            Some(s) => issues.push(Issue::error(
                "value",
                format!("{path}: '{s}' is not a valid {}", kind.name()),
                "URIs must not contain whitespace",
            )),
            None => issues.push(Issue::error(
                "value",
                format!("{path}: expected a {} string, found {}", kind.name(), type_name(value)),
                "Value must be a string representing a URI",
            )),
        }
    }

    fn check_url(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        match value.as_str() {
            Some(s) => {
                if url::Url::parse(s).is_err() {
                    issues.push(Issue::error(
                        "value",
                        format!("{path}: '{s}' is not a valid absolute URL"),
                        "Value must be an absolute URL",
                    ));
                }
            }
            None => issues.push(Issue::error(
                "value",
                format!("{path}: expected a URL string, found {}", type_name(value)),
                "Value must be a string representing a URL",
            )),
        }
    }

    fn check_oid(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        match value.as_str() {
            Some(s) if self.oid_regex.is_match(s) => {}
            Some(s) => issues.push(Issue::error(
                "value",
                format!("{path}: '{s}' is not a valid OID urn"),
                "OIDs use the form urn:oid:1.2.3",
            )),
            None => issues.push(Issue::error(
                "value",
                format!("{path}: expected an OID string, found {}", type_name(value)),
                "Value must be a string representing an OID urn",
            )),
        }
    }

    fn check_uuid(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        match value.as_str() {
            Some(s) if self.uuid_regex.is_match(s) => {}
            Some(s) => issues.push(Issue::error(
                "value",
                format!("{path}: '{s}' is not a valid UUID urn"),
                "UUIDs use the form urn:uuid:xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx",
            )),
            None => issues.push(Issue::error(
                "value",
                format!("{path}: expected a UUID string, found {}", type_name(value)),
                "Value must be a string representing a UUID urn",
            )),
        }
    }

    fn check_date(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        match value.as_str() {
            Some(s) => {
                let grammar_ok = self.date_regex.is_match(s);
                // Full-precision dates also get a calendar check (Feb 30 etc.)
                let calendar_ok = s.len() != 10 || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok();
                if !grammar_ok || !calendar_ok {
                    issues.push(Issue::error(
                        "value",
                        format!("{path}: '{s}' is not a valid date"),
                        "Dates use the form YYYY, YYYY-MM, or YYYY-MM-DD",
                    ));
                }
            }
            None => issues.push(Issue::error(
                "value",
                format!("{path}: expected a date string, found {}", type_name(value)),
                "Value must be a string representing a date",
            )),
        }
    }

    fn check_datetime(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        match value.as_str() {
            Some(s) => {
                let grammar_ok = self.datetime_regex.is_match(s);
                let calendar_ok = if s.contains('T') {
                    DateTime::parse_from_rfc3339(s).is_ok()
                } else if s.len() == 10 {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
                } else {
                    true
                };
                if !grammar_ok || !calendar_ok {
                    issues.push(Issue::error(
                        "value",
                        format!("{path}: '{s}' is not a valid dateTime"),
                        "A populated time portion requires seconds and a timezone",
                    ));
                }
            }
            None => issues.push(Issue::error(
                "value",
                format!("{path}: expected a dateTime string, found {}", type_name(value)),
                "Value must be a string representing a dateTime",
            )),
        }
    }

    fn check_instant(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        match value.as_str() {
            Some(s) => {
                if DateTime::parse_from_rfc3339(s).is_err() {
                    issues.push(Issue::error(
                        "value",
                        format!("{path}: '{s}' is not a valid instant"),
                        "Instants are full-precision timestamps with a timezone",
                    ));
                }
            }
            None => issues.push(Issue::error(
                "value",
                format!("{path}: expected an instant string, found {}", type_name(value)),
                "Value must be a string representing an instant",
            )),
        }
    }

    fn check_time(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) {
        match value.as_str() {
            Some(s) if self.time_regex.is_match(s) => {}
            Some(s) => issues.push(Issue::error(
                "value",
                format!("{path}: '{s}' is not a valid time"),
                "Times use the form hh:mm:ss with optional fractional seconds",
            )),
            None => issues.push(Issue::error(
                "value",
                format!("{path}: expected a time string, found {}", type_name(value)),
                "Value must be a string representing a time",
            )),
        }
    }
}

impl Default for PrimitiveValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON type name for diagnostics
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
