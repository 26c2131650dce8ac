//! HTTP server command
//!
//! Connects to PostgreSQL, verifies it answers, and serves until a
//! shutdown signal arrives.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use bookies_server::{run_server, DbConfig, DbPool, ServerConfig};

use crate::config::DbArgs;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, env = "APP_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "APP_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Per-request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT", default_value_t = 30)]
    pub request_timeout: u64,

    /// Apply pending migrations before serving
    #[arg(long)]
    pub migrate: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            request_timeout: Duration::from_secs(self.request_timeout),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.server_config();
    let db = DbConfig::from(args.db);

    tracing::info!(host = %db.host, port = db.port, database = %db.name, "connecting to database");

    let pool = DbPool::connect(&db)
        .await
        .context("Failed to create database pool")?;
    pool.ping().await.context("Database did not answer ping")?;

    if args.migrate {
        pool.migrate().await.context("Failed to apply migrations")?;
        tracing::info!("migrations applied");
    }

    tracing::info!("Starting bookies server on {}", config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        serve: ServeArgs,
    }

    #[test]
    fn bind_address_from_flags() {
        let harness = Harness::parse_from([
            "bookies",
            "--host",
            "0.0.0.0",
            "--port",
            "9090",
            "--request-timeout",
            "5",
        ]);
        let config = harness.serve.server_config();

        assert_eq!(config.bind_addr, "0.0.0.0:9090".parse().unwrap());
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(!harness.serve.migrate);
    }
}
