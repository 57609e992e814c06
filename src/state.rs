use std::sync::Arc;

use reqwest::Client;

use crate::{config::BackendConfig, features::expires::RuleSet};

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub rules: Arc<RuleSet>,
    pub backend: BackendConfig,
    pub http_client: Client,
}

impl AppState {
    pub fn new(rules: RuleSet, backend: BackendConfig) -> Self {
        Self {
            rules: Arc::new(rules),
            backend,
            http_client: Client::new(),
        }
    }
}
