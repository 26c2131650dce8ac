//! Database connection pool management
//!
//! The pool is built once at startup by the caller and handed down through
//! router state. Construction errors are returned, never cached.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::error::DbError;
use super::MIGRATOR;

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default time to wait for a connection before giving up.
const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for the relational store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    /// Full connection URL; takes precedence over the individual parts
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            user: "postgres".to_string(),
            password: String::new(),
            host: "localhost".to_string(),
            port: 5432,
            name: "bookies".to_string(),
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl DbConfig {
    /// Connection string for this configuration.
    ///
    /// `postgres://{user}:{pass}@{host}:{port}/{name}?sslmode=disable`
    /// unless an explicit URL was given.
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}?sslmode=disable",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
            .test_before_acquire(true)
    }
}

/// Shared handle to the PostgreSQL pool.
///
/// Cloning is cheap; all clones share the same connections.
#[derive(Debug, Clone)]
pub struct DbPool {
    pool: PgPool,
}

impl DbPool {
    /// Create the pool and open the first connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the store cannot be
    /// reached within the acquire timeout.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let pool = DbPool::connect(&DbConfig::default()).await?;
    /// pool.ping().await?;
    /// ```
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        tracing::debug!(
            host = %config.host,
            port = config.port,
            database = %config.name,
            explicit_url = config.url.is_some(),
            "connecting to database"
        );
        let pool = config
            .pool_options()
            .connect(&config.connection_url())
            .await?;
        Ok(Self { pool })
    }

    /// Create the pool without connecting; connections open on first use.
    pub fn connect_lazy(config: &DbConfig) -> Result<Self, DbError> {
        let pool = config.pool_options().connect_lazy(&config.connection_url())?;
        Ok(Self { pool })
    }

    /// Liveness check against the store.
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<(), DbError> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    /// Borrow the underlying sqlx pool.
    pub fn inner(&self) -> &PgPool {
        &self.pool
    }

    /// Close all connections, waiting for checked-out ones to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl From<PgPool> for DbPool {
    fn from(pool: PgPool) -> Self {
        Self { pool }
    }
}
