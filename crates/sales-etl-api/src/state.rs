use std::sync::Arc;

use sales_etl_core::config::Settings;
use sales_etl_core::store::SalesStore;

#[derive(Clone)]
pub struct AppState {
    settings: Arc<Settings>,
    store: Arc<dyn SalesStore>,
}

impl AppState {
    pub fn new(settings: Arc<Settings>, store: Arc<dyn SalesStore>) -> Self {
        Self { settings, store }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &dyn SalesStore {
        self.store.as_ref()
    }
}
