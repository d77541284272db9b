//! Extract -> transform -> load, reported as an [`EtlOutcome`].

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tokio::task;
use tracing::{error, info, warn};

use crate::error::{EtlError, Result};
use crate::store::SalesStore;
use crate::transform::{read_raw_table, records_from_frame, transform};

#[derive(Debug, Clone, PartialEq)]
pub enum EtlOutcome {
    Success { records_processed: u64 },
    NotFound { path: PathBuf },
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EtlStatus {
    Success,
    Error,
}

/// Wire shape of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EtlReport {
    pub status: EtlStatus,
    pub message: String,
    pub records_processed: u64,
}

impl EtlOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, EtlOutcome::Success { .. })
    }

    pub fn report(&self) -> EtlReport {
        match self {
            EtlOutcome::Success { records_processed } => EtlReport {
                status: EtlStatus::Success,
                message: "ETL process completed successfully".to_string(),
                records_processed: *records_processed,
            },
            EtlOutcome::NotFound { path } => EtlReport {
                status: EtlStatus::Error,
                message: format!("ETL process failed: {}", EtlError::NotFound(path.clone())),
                records_processed: 0,
            },
            EtlOutcome::Failed { message } => EtlReport {
                status: EtlStatus::Error,
                message: format!("ETL process failed: {message}"),
                records_processed: 0,
            },
        }
    }
}

/// Runs the whole pipeline for the CSV at `path`. Never returns an error:
/// every failure is folded into the outcome.
pub async fn run_etl(path: &Path, store: &dyn SalesStore) -> EtlOutcome {
    match execute(path, store).await {
        Ok(records_processed) => EtlOutcome::Success { records_processed },
        Err(EtlError::NotFound(path)) => {
            warn!(path = %path.display(), "input file not found");
            EtlOutcome::NotFound { path }
        }
        Err(err) => {
            error!(error = %err, path = %path.display(), "ETL process failed");
            EtlOutcome::Failed {
                message: err.to_string(),
            }
        }
    }
}

async fn execute(path: &Path, store: &dyn SalesStore) -> Result<u64> {
    store.ensure_schema().await?;

    let source = path.to_path_buf();
    let frame = task::spawn_blocking(move || extract_and_transform(&source))
        .await
        .map_err(|err| EtlError::Task(err.to_string()))??;

    let records = records_from_frame(&frame)?;
    let inserted = store.insert_batch(&records).await?;
    info!(records = inserted, "loaded records into database");

    Ok(inserted)
}

fn extract_and_transform(path: &Path) -> Result<DataFrame> {
    let raw = read_raw_table(path)?;
    Ok(transform(raw)?)
}
