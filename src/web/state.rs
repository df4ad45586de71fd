use crate::config::AppConfig;
use crate::llm::TextGenerator;
use std::sync::Arc;

/// Shared application state for the web server. Immutable after startup;
/// requests share nothing else.
pub struct AppState {
    pub config: AppConfig,
    pub llm: Arc<dyn TextGenerator>,
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(config: AppConfig, llm: Arc<dyn TextGenerator>) -> Self {
        Self {
            config,
            llm,
            startup_time: chrono::Utc::now(),
        }
    }
}
