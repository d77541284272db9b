use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

pub type DbPool = Pool<Postgres>;

/// Connections shared by the HTTP handlers and concurrent ETL runs.
const SALES_POOL_SIZE: u32 = 10;
const SALES_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens the pool backing the `sales_data` store. Creating the table is left
/// to `SalesStore::ensure_schema`.
pub async fn connect(database_url: &str) -> Result<DbPool> {
    PgPoolOptions::new()
        .max_connections(SALES_POOL_SIZE)
        .acquire_timeout(SALES_ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .context("failed to open the sales_data connection pool")
}
