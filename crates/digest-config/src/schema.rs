use anyhow::{Context, Result};
use digest_context::{CompactionPolicy, ContextConfig};
use digest_engine::SummaryOptions;
use digest_providers::ProviderConfig;
use digest_telemetry::TelemetryConfig;
use serde::{Deserialize, Serialize};

/// Main Digest configuration
///
/// Configuration is loaded from (in priority order):
/// 1. `digest.jsonc` - JSON with comments
/// 2. `digest.json` - Standard JSON
/// 3. `digest.yml` / `digest.yaml` - YAML format
///
/// Also checks hidden variants (`.digest.*`) and `~/.config/digest/` for global config.
/// Every section is optional.
///
/// # Example
///
/// ```yaml
/// provider:
///   kind: google
///   model: gemini-1.5-pro-latest
/// context:
///   reserve_percent: 25
/// summary:
///   length: long
/// telemetry:
///   level: debug
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Model vendor, model and context window override
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Response reservation and truncation settings
    #[serde(default)]
    pub context: ContextConfig,

    /// When long conversations are compressed
    #[serde(default)]
    pub compaction: CompactionPolicy,

    /// Summary length and timestamp preferences
    #[serde(default)]
    pub summary: SummaryOptions,

    /// Log level and format
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl DigestConfig {
    /// Reject settings the context manager cannot work with
    pub fn validate(&self) -> Result<()> {
        self.context
            .validate()
            .context("Invalid `context` settings")?;

        if self.provider.context_limit == Some(0) {
            anyhow::bail!("`provider.context_limit` must be greater than zero");
        }
        if self.compaction.threshold_percent > 100 {
            anyhow::bail!(
                "`compaction.threshold_percent` must be at most 100, got {}",
                self.compaction.threshold_percent
            );
        }
        Ok(())
    }
}
