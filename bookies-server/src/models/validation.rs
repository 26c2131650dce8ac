//! Field validation rules and their error messages
//!
//! Every inbound payload field carries an ordered list of [`Rule`]s. Only the
//! first rule a field breaks is reported, and each report carries the
//! offending value so clients can echo it back.

use std::fmt;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

/// Date layout shown to clients.
pub const DATE_LAYOUT: &str = "YYYY-MM-DD";

/// chrono equivalent of [`DATE_LAYOUT`].
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unicode letters, spaces, periods, apostrophes and hyphens.
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L} .'\-]+$").expect("invalid name regex"));

/// Dot-atom local part and a dotted domain; letters may be non-ASCII.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[\p{L}\p{N}!#$%&'*+/=?^_`{|}~-]+(?:\.[\p{L}\p{N}!#$%&'*+/=?^_`{|}~-]+)*@(?:[\p{L}\p{N}](?:[\p{L}\p{N}-]{0,61}[\p{L}\p{N}])?\.)+[\p{L}\p{N}](?:[\p{L}\p{N}-]{0,61}[\p{L}\p{N}])?$",
    )
    .expect("invalid email regex")
});

/// A single constraint on a payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present and non-empty
    Required,
    /// Person name: letters, spaces, `.`, `'` and `-`
    ValidName,
    /// Email address syntax
    Email,
    /// Length (strings) or value (numbers) at least N
    Gte(i64),
    /// Length (strings) or value (numbers) at most N
    Lte(i64),
    /// Calendar date in [`DATE_LAYOUT`]
    Datetime,
    /// Digits only
    Number,
    /// Field is present with the wrong JSON type
    Type,
}

impl Rule {
    /// Human readable message for a violation of this rule on `field`.
    pub fn message(&self, field: &str) -> String {
        match self {
            Self::Required => format!("{} is required", field),
            Self::Email => "invalid email format".to_owned(),
            Self::ValidName => "invalid name (digit is not allowed)".to_owned(),
            Self::Gte(min) => format!("value must be greater or equal than {}", min),
            Self::Lte(max) => format!("value must be less or equal than {}", max),
            Self::Datetime => format!("datetime format must be {}", DATE_LAYOUT),
            Self::Number => "only accept positive number".to_owned(),
            Self::Type => "invalid value".to_owned(),
        }
    }

    /// Whether a string value satisfies this rule.
    ///
    /// `Type` is decided before string content is looked at, so it always
    /// accepts here.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Required => !value.is_empty(),
            Self::ValidName => NAME_RE.is_match(value),
            Self::Email => EMAIL_RE.is_match(value),
            Self::Gte(min) => value.chars().count() as i64 >= *min,
            Self::Lte(max) => value.chars().count() as i64 <= *max,
            Self::Datetime => parse_date(value).is_some(),
            Self::Number => !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
            Self::Type => true,
        }
    }
}

/// Parse a strict `YYYY-MM-DD` date.
///
/// The shape is checked byte by byte first; chrono alone accepts signed
/// years and space-padded fields.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == DATE_LAYOUT.len()
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// One violated field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub value: Value,
    #[serde(skip)]
    pub rule: Rule,
}

impl ValidationError {
    pub fn new(field: &str, rule: Rule, value: Value) -> Self {
        Self {
            field: field.to_owned(),
            message: rule.message(field),
            value,
            rule,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered list of violations for one payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a payload with exactly one bad field.
    pub fn single(field: &str, rule: Rule, value: Value) -> Self {
        Self(vec![ValidationError::new(field, rule, value)])
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Payload types that can be built from a JSON object.
pub trait FromPayload: Sized {
    fn from_payload(body: &Map<String, Value>) -> Result<Self, ValidationErrors>;
}

/// Read a string field, reporting the first rule it breaks.
///
/// Missing, `null` and (for optional fields with rules) empty strings read as
/// `None`. Optional fields without rules keep empty strings as given.
pub(crate) fn string_field(
    body: &Map<String, Value>,
    field: &'static str,
    rules: &[Rule],
    errors: &mut ValidationErrors,
) -> Option<String> {
    let required = rules.contains(&Rule::Required);

    let raw = match body.get(field) {
        None | Some(Value::Null) => {
            if required {
                errors.push(ValidationError::new(field, Rule::Required, Value::Null));
            }
            return None;
        }
        Some(raw) => raw,
    };

    let Some(text) = raw.as_str() else {
        errors.push(ValidationError::new(field, Rule::Type, raw.clone()));
        return None;
    };

    if text.is_empty() && !required && !rules.is_empty() {
        return None;
    }

    match rules.iter().find(|rule| !rule.accepts(text)) {
        Some(rule) => {
            errors.push(ValidationError::new(field, *rule, raw.clone()));
            None
        }
        None => Some(text.to_owned()),
    }
}

/// Read an identifier that may arrive as a JSON integer or a digit string.
pub(crate) fn id_field(
    body: &Map<String, Value>,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<i64> {
    let raw = match body.get(field) {
        None | Some(Value::Null) => {
            errors.push(ValidationError::new(field, Rule::Required, Value::Null));
            return None;
        }
        Some(raw) => raw,
    };

    let parsed = match raw {
        Value::Number(n) => n.as_i64().filter(|id| *id >= 0),
        Value::String(s) if s.is_empty() => {
            errors.push(ValidationError::new(field, Rule::Required, raw.clone()));
            return None;
        }
        Value::String(s) if Rule::Number.accepts(s) => s.parse::<i64>().ok(),
        Value::String(_) => None,
        _ => {
            errors.push(ValidationError::new(field, Rule::Type, raw.clone()));
            return None;
        }
    };

    if parsed.is_none() {
        errors.push(ValidationError::new(field, Rule::Number, raw.clone()));
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn message_table() {
        assert_eq!(Rule::Required.message("name"), "name is required");
        assert_eq!(Rule::Email.message("email"), "invalid email format");
        assert_eq!(
            Rule::ValidName.message("name"),
            "invalid name (digit is not allowed)"
        );
        assert_eq!(Rule::Gte(3).message("name"), "value must be greater or equal than 3");
        assert_eq!(Rule::Lte(65).message("name"), "value must be less or equal than 65");
        assert_eq!(
            Rule::Datetime.message("birth_date"),
            "datetime format must be YYYY-MM-DD"
        );
        assert_eq!(Rule::Number.message("id"), "only accept positive number");
        assert_eq!(Rule::Type.message("bio"), "invalid value");
    }

    #[test]
    fn name_rule_accepts_non_latin_letters() {
        assert!(Rule::ValidName.accepts("Zoë O'Brien-Smith Jr."));
        assert!(Rule::ValidName.accepts("Ngũgĩ wa Thiong'o"));
        assert!(Rule::ValidName.accepts("紫式部"));
        assert!(!Rule::ValidName.accepts("R2D2"));
        assert!(!Rule::ValidName.accepts("name_with_underscore"));
    }

    #[test]
    fn email_rule() {
        assert!(Rule::Email.accepts("someone@example.org"));
        assert!(Rule::Email.accepts("first.last+tag@sub.example.co"));
        assert!(!Rule::Email.accepts("someone"));
        assert!(!Rule::Email.accepts("someone@"));
        assert!(!Rule::Email.accepts("@example.org"));
        assert!(!Rule::Email.accepts("two words@example.org"));
    }

    #[test]
    fn email_rule_wants_dot_atoms_and_a_dotted_domain() {
        assert!(!Rule::Email.accepts("a..b@example.org"));
        assert!(!Rule::Email.accepts(".a@example.org"));
        assert!(!Rule::Email.accepts("a.@example.org"));
        assert!(!Rule::Email.accepts("user@localhost"));
        assert!(!Rule::Email.accepts("user@-example.org"));
        assert!(!Rule::Email.accepts("user@example..org"));
        assert!(Rule::Email.accepts("a.b@example.org"));
    }

    #[test]
    fn email_rule_allows_non_ascii_letters() {
        assert!(Rule::Email.accepts("josé@example.org"));
        assert!(Rule::Email.accepts("ngũgĩ@bücher.de"));
    }

    #[test]
    fn length_rules_count_characters() {
        assert!(Rule::Gte(3).accepts("Zoë"));
        assert!(!Rule::Gte(3).accepts("Al"));
        assert!(Rule::Lte(3).accepts("ééé"));
        assert!(!Rule::Lte(3).accepts("éééé"));
    }

    #[test]
    fn datetime_rule_is_strict() {
        assert!(Rule::Datetime.accepts("1999-12-31"));
        assert!(!Rule::Datetime.accepts("1999-2-3"));
        assert!(!Rule::Datetime.accepts("1999-02-30"));
        assert!(!Rule::Datetime.accepts("31-12-1999"));
        assert!(!Rule::Datetime.accepts("1999-12-31T00:00:00Z"));
        assert!(!Rule::Datetime.accepts("-999-01-01"));
        assert!(!Rule::Datetime.accepts("+999-01-01"));
        assert!(!Rule::Datetime.accepts(" 999-01-01"));
        assert!(!Rule::Datetime.accepts("1999- 1-01"));
        assert!(!Rule::Datetime.accepts("1999-01- 1"));
        assert!(!Rule::Datetime.accepts("1999/01/01"));
        assert_eq!(parse_date("0999-01-01"), NaiveDate::from_ymd_opt(999, 1, 1));
    }

    #[test]
    fn number_rule_is_digits_only() {
        assert!(Rule::Number.accepts("42"));
        assert!(!Rule::Number.accepts("-1"));
        assert!(!Rule::Number.accepts("4.2"));
        assert!(!Rule::Number.accepts(""));
    }

    #[test]
    fn string_field_reports_first_broken_rule_only() {
        let mut errors = ValidationErrors::new();
        let rules = [Rule::Required, Rule::ValidName, Rule::Gte(3)];
        let value = string_field(&body(json!({"name": "A1"})), "name", &rules, &mut errors);

        assert!(value.is_none());
        assert_eq!(errors.len(), 1);
        let err = errors.iter().next().unwrap();
        assert_eq!(err.rule, Rule::ValidName);
        assert_eq!(err.value, json!("A1"));
    }

    #[test]
    fn string_field_missing_required() {
        let mut errors = ValidationErrors::new();
        string_field(&body(json!({})), "email", &[Rule::Required], &mut errors);
        let err = errors.iter().next().unwrap();
        assert_eq!(err.message, "email is required");
        assert_eq!(err.value, Value::Null);
    }

    #[test]
    fn string_field_wrong_type() {
        let mut errors = ValidationErrors::new();
        string_field(&body(json!({"bio": 12})), "bio", &[], &mut errors);
        assert_eq!(errors.iter().next().unwrap().rule, Rule::Type);
    }

    #[test]
    fn optional_field_with_rules_treats_empty_as_absent() {
        let mut errors = ValidationErrors::new();
        let value = string_field(
            &body(json!({"birth_date": ""})),
            "birth_date",
            &[Rule::Datetime],
            &mut errors,
        );
        assert!(value.is_none());
        assert!(errors.is_empty());
    }

    #[test]
    fn id_field_accepts_numbers_and_digit_strings() {
        let mut errors = ValidationErrors::new();
        assert_eq!(id_field(&body(json!({"id": 7})), "id", &mut errors), Some(7));
        assert_eq!(id_field(&body(json!({"id": "8"})), "id", &mut errors), Some(8));
        assert!(errors.is_empty());

        id_field(&body(json!({"id": "x"})), "id", &mut errors);
        id_field(&body(json!({"id": -3})), "id", &mut errors);
        id_field(&body(json!({"id": 1.5})), "id", &mut errors);
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.rule == Rule::Number));
    }

    #[test]
    fn serializes_as_list() {
        let errors = ValidationErrors::single("name", Rule::Required, Value::Null);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            json!([{"field": "name", "message": "name is required", "value": null}])
        );
    }
}
