//! Path identifier validation

use serde_json::Value;

use super::validation::{Rule, ValidationErrors};

/// Parse an `{id}` path segment into a positive row id.
///
/// # Example
/// ```
/// use bookies_server::models::parse_id;
///
/// assert_eq!(parse_id("42").unwrap(), 42);
/// assert!(parse_id("0").is_err());
/// assert!(parse_id("abc").is_err());
/// ```
pub fn parse_id(raw: &str) -> Result<i64, ValidationErrors> {
    let reject = |rule| ValidationErrors::single("id", rule, Value::String(raw.to_owned()));

    if raw.is_empty() {
        return Err(reject(Rule::Required));
    }
    if !Rule::Number.accepts(raw) {
        return Err(reject(Rule::Number));
    }

    // digits only, so the only parse failure left is overflow
    let id = raw.parse::<i64>().map_err(|_| reject(Rule::Number))?;
    if id < 1 {
        return Err(reject(Rule::Gte(1)));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_of(raw: &str) -> Rule {
        parse_id(raw).unwrap_err().iter().next().unwrap().rule
    }

    #[test]
    fn accepts_positive_integers() {
        assert_eq!(parse_id("1").unwrap(), 1);
        assert_eq!(parse_id("0012").unwrap(), 12);
    }

    #[test]
    fn rejects_non_numbers() {
        assert_eq!(rule_of("abc"), Rule::Number);
        assert_eq!(rule_of("-4"), Rule::Number);
        assert_eq!(rule_of("1e3"), Rule::Number);
        assert_eq!(rule_of("99999999999999999999"), Rule::Number);
    }

    #[test]
    fn rejects_zero() {
        let err = parse_id("0").unwrap_err();
        let first = err.iter().next().unwrap();
        assert_eq!(first.rule, Rule::Gte(1));
        assert_eq!(first.message, "value must be greater or equal than 1");
        assert_eq!(first.value, Value::String("0".into()));
    }
}
