//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Detail and listing queries carry their joined aggregates
//! - Writes run inside one transaction and are rolled back on drop
//! - Update and delete look the row up first so a missing id is `NotFound`

pub mod authors;
pub mod books;

pub use authors::{Author, AuthorRepo};
pub use books::{Book, BookRepo};
