// crates/sales-etl-core/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("File {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No columns to parse from file")]
    EmptyInput,

    #[error("Row {line} has {found} fields, expected {expected}")]
    RaggedRow {
        line: u64,
        found: usize,
        expected: usize,
    },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("Background task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, EtlError>;
