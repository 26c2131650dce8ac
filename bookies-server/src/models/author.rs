//! Author payload validation

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::validation::{parse_date, string_field, FromPayload, Rule, ValidationErrors};

/// Minimum author name length, in characters
pub const MIN_NAME_LEN: i64 = 3;

/// Maximum author name length, in characters
pub const MAX_NAME_LEN: i64 = 65;

/// Validated body of `POST /authors` and `PUT /authors/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorInput {
    pub name: String,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
    pub bio: Option<String>,
}

impl FromPayload for AuthorInput {
    /// # Rules
    /// - `name`: required, letters/spaces/`.'-` only, 3 to 65 characters
    /// - `email`: required, email syntax
    /// - `birth_date`: optional, `YYYY-MM-DD`
    /// - `bio`: optional free text
    ///
    /// # Example
    /// ```
    /// use bookies_server::models::{AuthorInput, FromPayload};
    /// use serde_json::json;
    ///
    /// let body = json!({"name": "Mary Shelley", "email": "mary@example.org"});
    /// assert!(AuthorInput::from_payload(body.as_object().unwrap()).is_ok());
    ///
    /// let body = json!({"name": "M4ry", "email": "mary@example.org"});
    /// assert!(AuthorInput::from_payload(body.as_object().unwrap()).is_err());
    /// ```
    fn from_payload(body: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = string_field(
            body,
            "name",
            &[
                Rule::Required,
                Rule::ValidName,
                Rule::Gte(MIN_NAME_LEN),
                Rule::Lte(MAX_NAME_LEN),
            ],
            &mut errors,
        );
        let email = string_field(body, "email", &[Rule::Required, Rule::Email], &mut errors);
        let birth_date = string_field(body, "birth_date", &[Rule::Datetime], &mut errors)
            .and_then(|s| parse_date(&s));
        let bio = string_field(body, "bio", &[], &mut errors);

        match (name, email) {
            (Some(name), Some(email)) if errors.is_empty() => Ok(Self {
                name,
                email,
                birth_date,
                bio,
            }),
            _ => Err(errors),
        }
    }
}
