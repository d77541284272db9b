// crates/sales-etl-core/src/types.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of `sales_data` as persisted, including the store-assigned fields.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SalesRecord {
    pub id: i32,
    pub product_name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i32,
    pub total_amount: f64,
    pub sale_date: String,
    pub created_at: DateTime<Utc>,
}

/// A load-ready row produced by the transform stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewSalesRecord {
    pub product_name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i32,
    pub total_amount: f64,
    pub sale_date: String,
}

/// Skip/take window for listing records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "Page::default_limit")]
    pub limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 100;

    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    fn default_limit() -> u32 {
        Self::DEFAULT_LIMIT
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
