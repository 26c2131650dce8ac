//! HTTP server layer
//!
//! Axum server with:
//! - Validating extractors for ids, pages and JSON bodies
//! - Request tracing and timeouts
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use error::{ApiError, Resource};
pub use server::{router, run_server, AppState, ServerConfig, ServerError};
