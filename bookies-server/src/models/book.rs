//! Book payload validation

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::validation::{
    id_field, parse_date, string_field, FromPayload, Rule, ValidationErrors,
};

/// Maximum length for book titles, in characters
pub const MAX_TITLE_LEN: i64 = 128;

/// Validated body of `POST /books` and `PUT /books/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInput {
    pub title: String,
    pub description: Option<String>,
    pub pub_date: NaiveDate,
    pub author_id: i64,
}

impl FromPayload for BookInput {
    fn from_payload(body: &Map<String, Value>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = string_field(
            body,
            "title",
            &[Rule::Required, Rule::Lte(MAX_TITLE_LEN), Rule::Gte(1)],
            &mut errors,
        );
        let description = string_field(body, "description", &[], &mut errors);
        let pub_date = string_field(body, "pub_date", &[Rule::Required, Rule::Datetime], &mut errors)
            .and_then(|s| parse_date(&s));
        let author_id = id_field(body, "author_id", &mut errors);

        match (title, pub_date, author_id) {
            (Some(title), Some(pub_date), Some(author_id)) if errors.is_empty() => Ok(Self {
                title,
                description,
                pub_date,
                author_id,
            }),
            _ => Err(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<BookInput, ValidationErrors> {
        BookInput::from_payload(value.as_object().unwrap())
    }

    #[test]
    fn valid_book_with_string_author_id() {
        let book = parse(json!({
            "title": "Things Fall Apart",
            "pub_date": "1958-06-17",
            "author_id": "3"
        }))
        .unwrap();

        assert_eq!(book.author_id, 3);
        assert_eq!(book.pub_date, NaiveDate::from_ymd_opt(1958, 6, 17).unwrap());
        assert_eq!(book.description, None);
    }

    #[test]
    fn valid_book_with_numeric_author_id() {
        let book = parse(json!({
            "title": "Arrow of God",
            "description": "Second of the African trilogy",
            "pub_date": "1964-01-01",
            "author_id": 3
        }))
        .unwrap();
        assert_eq!(book.author_id, 3);
        assert_eq!(book.description.as_deref(), Some("Second of the African trilogy"));
    }

    #[test]
    fn empty_body_reports_required_fields() {
        let err = parse(json!({})).unwrap_err();
        let fields: Vec<_> = err.iter().map(|e| (e.field.as_str(), e.rule)).collect();
        assert_eq!(
            fields,
            vec![
                ("title", Rule::Required),
                ("pub_date", Rule::Required),
                ("author_id", Rule::Required),
            ]
        );
    }

    #[test]
    fn title_too_long() {
        let err = parse(json!({
            "title": "x".repeat(129),
            "pub_date": "2000-01-01",
            "author_id": 1
        }))
        .unwrap_err();
        assert_eq!(
            err.iter().next().unwrap().message,
            "value must be less or equal than 128"
        );
    }

    #[test]
    fn bad_author_id_and_date() {
        let err = parse(json!({
            "title": "Anthills of the Savannah",
            "pub_date": "1987",
            "author_id": "three"
        }))
        .unwrap_err();
        let messages: Vec<_> = err.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["datetime format must be YYYY-MM-DD", "only accept positive number"]
        );
    }
}
