//! Provider configuration

use digest_protocol::Provider;
use serde::{Deserialize, Serialize};

use crate::catalog;

/// Which vendor and model to talk to
///
/// # Example
///
/// ```yaml
/// provider:
///   kind: anthropic
///   model: claude-3-haiku-20240307
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Vendor name (openai, anthropic, google, local)
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Model identifier; the vendor default when omitted
    #[serde(default)]
    pub model: Option<String>,

    /// Context window override in tokens; required for most local servers
    #[serde(default)]
    pub context_limit: Option<usize>,
}

fn default_kind() -> String {
    Provider::default().to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            model: None,
            context_limit: None,
        }
    }
}

impl ProviderConfig {
    pub fn new(provider: Provider) -> Self {
        Self {
            kind: provider.to_string(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_context_limit(mut self, limit: usize) -> Self {
        self.context_limit = Some(limit);
        self
    }

    /// Vendor named by `kind`; unsupported names fall back to OpenAI
    pub fn provider(&self) -> Provider {
        match self.kind.parse::<Provider>() {
            Ok(provider) => provider,
            Err(err) => {
                tracing::error!(%err, "defaulting to openai");
                Provider::OpenAI
            }
        }
    }

    pub fn model_name(&self) -> String {
        self.model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| catalog::default_model(self.provider()).to_string())
    }

    pub fn resolved_context_limit(&self) -> usize {
        catalog::context_limit(self.provider(), &self.model_name(), self.context_limit)
    }
}
