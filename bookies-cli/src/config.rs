//! Process configuration
//!
//! Values come from flags, then the environment, then `./.env`, then the
//! defaults below. `.env` never overrides variables already set.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use bookies_server::DbConfig;

/// Load `./.env` into the process environment if present.
///
/// Runs before argument parsing so `env = "..."` fallbacks see it; the
/// outcome is logged later by [`report_dotenv`].
pub fn load_dotenv() -> dotenvy::Result<PathBuf> {
    dotenvy::dotenv()
}

/// Log how `.env` loading went once tracing is up.
pub fn report_dotenv(result: &dotenvy::Result<PathBuf>) {
    match result {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "ignoring malformed .env"),
    }
}

/// Database connection arguments shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// Database user
    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "DB_PASS", default_value = "", hide_env_values = true)]
    pub db_pass: String,

    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// Database name
    #[arg(long, env = "DB_NAME", default_value = "bookies")]
    pub db_name: String,

    /// Full connection URL; overrides the DB_* components
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub db_max_connections: u32,

    /// Seconds to wait for a pooled connection
    #[arg(long, env = "DB_TIMEOUT", default_value_t = 5)]
    pub db_timeout: u64,
}

impl From<DbArgs> for DbConfig {
    fn from(args: DbArgs) -> Self {
        Self {
            user: args.db_user,
            password: args.db_pass,
            host: args.db_host,
            port: args.db_port,
            name: args.db_name,
            url: args.database_url.filter(|url| !url.is_empty()),
            max_connections: args.db_max_connections,
            acquire_timeout: Duration::from_secs(args.db_timeout),
        }
    }
}
