use axum::extract::{Query, State};
use axum::Json;
use sales_etl_core::config::PublicSettings;
use sales_etl_core::pipeline::{self, EtlOutcome, EtlReport};
use sales_etl_core::types::{Page, SalesRecord};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

pub const DEFAULT_FILE_NAME: &str = "sample_data.csv";

#[derive(Debug, Deserialize)]
pub struct EtlRunParams {
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let settings = state.settings();
    Json(json!({
        "message": format!("Welcome to {}", settings.app_name),
        "version": settings.app_version,
        "debug": settings.debug,
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    match state.store().ping().await {
        Ok(()) => Json(json!({ "status": "healthy", "database": "connected" })),
        Err(err) => {
            tracing::warn!("health check could not reach the database: {err}");
            Json(json!({ "status": "unhealthy", "database": "disconnected" }))
        }
    }
}

pub async fn run_etl(
    State(state): State<AppState>,
    Query(params): Query<EtlRunParams>,
) -> Result<Json<EtlReport>, ApiError> {
    let not_found = || ApiError::NotFound(format!("File {} not found", params.file_name));

    let path = state
        .settings()
        .resolve_data_file(&params.file_name)
        .ok_or_else(not_found)?;
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Err(not_found());
    }

    info!(file_name = %params.file_name, "starting ETL run");
    let outcome = pipeline::run_etl(&path, state.store()).await;
    match outcome {
        EtlOutcome::Success { .. } => Ok(Json(outcome.report())),
        EtlOutcome::NotFound { .. } => Err(not_found()),
        EtlOutcome::Failed { .. } => Err(ApiError::Internal(outcome.report().message)),
    }
}

pub async fn list_sales(
    State(state): State<AppState>,
    Query(page): Query<Page>,
) -> Result<Json<Vec<SalesRecord>>, ApiError> {
    Ok(Json(state.store().list(page).await?))
}

pub async fn count_sales(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let total = state.store().count().await?;
    Ok(Json(json!({ "total_records": total })))
}

pub async fn clear_sales(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let deleted = state.store().clear_all().await?;
    info!(deleted, "cleared sales data");
    Ok(Json(json!({ "message": format!("Deleted {deleted} records") })))
}

pub async fn config(State(state): State<AppState>) -> Json<PublicSettings> {
    Json(state.settings().public())
}
