//! bookies-server: HTTP API for authors and their books
//!
//! Layers, bottom-up:
//! - [`models`]: payload validation and pagination
//! - [`db`]: PostgreSQL pool, migrations and repositories
//! - [`http`]: Axum routes, extractors and error mapping

pub mod db;
pub mod http;
pub mod models;

pub use db::{DbConfig, DbError, DbPool, MIGRATOR};
pub use http::{router, run_server, ServerConfig, ServerError};
