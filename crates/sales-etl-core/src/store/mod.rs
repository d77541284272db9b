//! Persistence for sales records.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{NewSalesRecord, Page, SalesRecord};

pub use memory::MemorySalesStore;
pub use postgres::PgSalesStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database query failed: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait SalesStore: Send + Sync {
    /// Creates the `sales_data` table and its indexes if they do not exist.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Appends every record as one batch. Either all rows are committed or none.
    async fn insert_batch(&self, records: &[NewSalesRecord]) -> Result<u64, StoreError>;

    async fn list(&self, page: Page) -> Result<Vec<SalesRecord>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;

    /// Deletes every record, returning how many were removed.
    async fn clear_all(&self) -> Result<u64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
