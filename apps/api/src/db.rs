use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Connection pool over the resume, section, and chat tables. Sized from
/// config; a short acquire timeout keeps a saturated pool from stalling
/// chat turns indefinitely.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .context("Failed to connect to Postgres")?;

    info!("Postgres pool ready (max {max_connections} connections)");
    Ok(pool)
}
