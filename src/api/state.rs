use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::services::{JikanProvider, MediaProvider};

/// Shared application state
///
/// Holds nothing mutable; every request is independent.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MediaProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn MediaProvider>) -> Self {
        Self { provider }
    }

    /// Builds state backed by the Jikan API described in `config`
    pub fn from_config(config: &Config) -> Self {
        let provider = JikanProvider::new(
            config.jikan_api_url.clone(),
            Duration::from_millis(config.jikan_request_delay_ms),
        );
        Self::new(Arc::new(provider))
    }
}
