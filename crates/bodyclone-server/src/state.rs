//! Application state

use bodyclone_core::ViewerConfig;
use std::sync::Arc;

use crate::config::Config;

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: Config,
    /// Constants the frontend is built with, exposed for inspection
    pub viewer: ViewerConfig,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            config,
            viewer: ViewerConfig::default(),
        })
    }
}
