use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{SalesStore, StoreError};
use crate::types::{NewSalesRecord, Page, SalesRecord};

/// Process-local store with the same semantics as the Postgres table.
/// Used for dry runs and in tests.
#[derive(Debug, Default)]
pub struct MemorySalesStore {
    inner: Mutex<MemoryTable>,
}

#[derive(Debug, Default)]
struct MemoryTable {
    last_id: i32,
    rows: Vec<SalesRecord>,
}

impl MemorySalesStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SalesStore for MemorySalesStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_batch(&self, records: &[NewSalesRecord]) -> Result<u64, StoreError> {
        let mut table = self.inner.lock().await;
        let created_at = Utc::now();

        for record in records {
            table.last_id += 1;
            let id = table.last_id;
            table.rows.push(SalesRecord {
                id,
                product_name: record.product_name.clone(),
                category: record.category.clone(),
                price: record.price,
                quantity: record.quantity,
                total_amount: record.total_amount,
                sale_date: record.sale_date.clone(),
                created_at,
            });
        }

        Ok(records.len() as u64)
    }

    async fn list(&self, page: Page) -> Result<Vec<SalesRecord>, StoreError> {
        let table = self.inner.lock().await;
        Ok(table
            .rows
            .iter()
            .skip(page.skip as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.inner.lock().await.rows.len() as i64)
    }

    async fn clear_all(&self) -> Result<u64, StoreError> {
        let mut table = self.inner.lock().await;
        let deleted = table.rows.len() as u64;
        table.rows.clear();
        Ok(deleted)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
