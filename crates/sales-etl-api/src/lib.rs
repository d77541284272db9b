//! HTTP surface over the sales ETL pipeline and record store.

mod error;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{delete, get, post};
use axum::Router;
use sales_etl_core::config::Settings;
use sales_etl_core::store::SalesStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::ApiError;
pub use routes::DEFAULT_FILE_NAME;
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/etl/run", post(routes::run_etl))
        .route("/sales", get(routes::list_sales))
        .route("/sales/", get(routes::list_sales))
        .route("/sales/count", get(routes::count_sales))
        .route("/sales/clear", delete(routes::clear_sales))
        .route("/config", get(routes::config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until the process is stopped.
pub async fn serve(settings: Arc<Settings>, store: Arc<dyn SalesStore>) -> Result<()> {
    let address = format!("{}:{}", settings.host, settings.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("listening on {}", listener.local_addr()?);

    let router = router(AppState::new(settings, store));
    axum::serve(listener, router.into_make_service()).await?;

    Ok(())
}
