//! Shared handler state.

use std::sync::Arc;

use inventix_core::StockPolicy;
use inventix_db::Database;

use crate::config::AppConfig;

/// Cloned into every handler by axum's `State` extractor.
///
/// Both fields are cheap to clone: `Database` wraps a pooled handle and the
/// configuration is shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        AppState {
            db,
            config: Arc::new(config),
        }
    }

    pub fn stock_policy(&self) -> StockPolicy {
        self.config.sales.stock_policy
    }
}
