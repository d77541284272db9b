use async_trait::async_trait;

use super::{SalesStore, StoreError};
use crate::db::DbPool;
use crate::types::{NewSalesRecord, Page, SalesRecord};

const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS sales_data (
        id SERIAL PRIMARY KEY,
        product_name VARCHAR NOT NULL,
        category VARCHAR NOT NULL,
        price DOUBLE PRECISION NOT NULL,
        quantity INTEGER NOT NULL,
        total_amount DOUBLE PRECISION NOT NULL,
        sale_date VARCHAR NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ix_sales_data_product_name ON sales_data (product_name)",
    "CREATE INDEX IF NOT EXISTS ix_sales_data_category ON sales_data (category)",
];

#[derive(Clone)]
pub struct PgSalesStore {
    pool: DbPool,
}

impl PgSalesStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SalesStore for PgSalesStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA_STATEMENTS {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn insert_batch(&self, records: &[NewSalesRecord]) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO sales_data (
                    product_name,
                    category,
                    price,
                    quantity,
                    total_amount,
                    sale_date
                ) VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&record.product_name)
            .bind(&record.category)
            .bind(record.price)
            .bind(record.quantity)
            .bind(record.total_amount)
            .bind(&record.sale_date)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(records.len() as u64)
    }

    async fn list(&self, page: Page) -> Result<Vec<SalesRecord>, StoreError> {
        let records = sqlx::query_as::<_, SalesRecord>(
            r#"
            SELECT
                id,
                product_name,
                category,
                price,
                quantity,
                total_amount,
                sale_date,
                created_at
            FROM sales_data
            ORDER BY id
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(i64::from(page.skip))
        .bind(i64::from(page.limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales_data")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn clear_all(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sales_data")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
