//! Inbound payloads with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationErrors, not panic.

pub mod validation;
pub mod author;
pub mod book;
pub mod identifier;
pub mod pagination;

pub use validation::{FromPayload, Rule, ValidationError, ValidationErrors, DATE_LAYOUT};
pub use author::AuthorInput;
pub use book::BookInput;
pub use identifier::parse_id;
pub use pagination::{
    PageWindow, Paginated, Pagination, PaginationError, PaginationParams, DEFAULT_LIMIT, MAX_LIMIT,
    MIN_LIMIT,
};
