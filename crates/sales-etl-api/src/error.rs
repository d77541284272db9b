use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sales_etl_core::store::StoreError;
use serde_json::json;

/// Error returned by handlers, rendered as `{"detail": ...}`.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
            ApiError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!("store query failed: {err}");
        ApiError::Internal(err.to_string())
    }
}
