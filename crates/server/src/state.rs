use std::sync::Arc;
use sktorrent_core::{Config, SanitizedConfig, StreamResolver};

/// Shared application state
pub struct AppState {
    config: Config,
    resolver: Arc<StreamResolver>,
}

impl AppState {
    pub fn new(config: Config, resolver: Arc<StreamResolver>) -> Self {
        Self { config, resolver }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolver(&self) -> &StreamResolver {
        self.resolver.as_ref()
    }
}
