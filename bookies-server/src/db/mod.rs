//! Database layer - connection pool and repositories
//!
//! # Design Principles
//!
//! - One pool per process, passed down explicitly
//! - Listings JOIN their aggregates - no N+1 queries
//! - Rely on DB constraints, classify the violations - no check-then-insert
//! - One transaction per multi-statement write

pub mod error;
pub mod pool;
pub mod repos;

pub use error::DbError;
pub use pool::{DbConfig, DbPool};
pub use repos::*;

/// Embedded schema migrations (`migrations/` at the workspace root).
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../migrations");
