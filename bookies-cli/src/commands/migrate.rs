//! Schema migration command

use anyhow::{Context, Result};

use bookies_server::{DbConfig, DbPool};

use crate::config::DbArgs;

/// Apply pending migrations and exit
pub async fn run_migrate(args: DbArgs) -> Result<()> {
    let db = DbConfig::from(args);

    let pool = DbPool::connect(&db)
        .await
        .context("Failed to create database pool")?;
    pool.migrate().await.context("Failed to apply migrations")?;
    pool.close().await;

    tracing::info!(database = %db.name, "migrations applied");
    Ok(())
}
