use std::sync::Arc;

use crate::config::AppConfig;

/// Shared, read-only request context. Forecasts keep no state between calls.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
