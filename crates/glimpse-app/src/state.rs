use std::sync::Arc;

use glimpse_config::Config;
use glimpse_core::RecognitionEngine;
use tokio::sync::RwLock;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub engine: Arc<dyn RecognitionEngine>,
}

impl AppState {
    pub fn new(config: Config, engine: Arc<dyn RecognitionEngine>) -> Self {
        tracing::info!("recognition engine: {}", engine.name());

        Self {
            config: Arc::new(RwLock::new(config)),
            engine,
        }
    }
}
