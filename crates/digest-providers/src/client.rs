//! Model client builder

use std::sync::Arc;

use crate::{ModelClient, OfflineClient, ProviderConfig, ProviderError};

/// Builder for creating model clients
pub struct ModelClientBuilder {
    config: ProviderConfig,
}

impl ModelClientBuilder {
    pub fn new() -> Self {
        Self {
            config: ProviderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ProviderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Arc<dyn ModelClient>, ProviderError> {
        if self.config.context_limit == Some(0) {
            return Err(ProviderError::Configuration(
                "context_limit must be greater than zero".to_string(),
            ));
        }

        let client = OfflineClient::from_config(&self.config);
        tracing::debug!(
            provider = %client.provider(),
            model = client.model(),
            context_limit = client.context_limit(),
            "built model client"
        );
        Ok(Arc::new(client))
    }
}

impl Default for ModelClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
