use anyhow::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use crate::config::Config;

pub mod clusters;
pub mod helpers;
pub mod progress;
pub mod regions;
pub mod views;

/// Schema of the boundary tables
pub const BOUNDARY_SCHEMA: &str = "se4all";
/// Schema of the materialized views and gauge maximums
pub const WEB_SCHEMA: &str = "web";

/// Read-only handle on the geospatial database.
///
/// Opened once at startup and passed by reference to every query; each
/// query borrows one pooled connection for a single statement.
#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(config: &Config) -> Result<Self> {
        tracing::info!("Connecting to {}", config.redacted_database_url());
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .idle_timeout(Duration::from_secs(600))      // 10 minute idle timeout
            .max_lifetime(Duration::from_secs(1800))     // 30 minute max lifetime
            .connect(&config.database_url())
            .await?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool_config(database_url: &str, max_connections: u32, min_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(60))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(900))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Closes every pooled connection. Queries issued afterwards fail.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("Database pool closed");
    }
}
