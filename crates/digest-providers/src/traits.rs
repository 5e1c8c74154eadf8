//! Model client traits

use async_trait::async_trait;
use digest_protocol::{Message, Provider};
use serde::{Deserialize, Serialize};

use crate::ProviderError;

/// Result type for model operations
pub type ModelResult<T> = Result<T, ProviderError>;

/// Sampling settings for a single request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

impl CompletionOptions {
    pub fn new(max_tokens: usize, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature: temperature.clamp(0.0, 2.0),
        }
    }
}

/// Capabilities every LLM vendor exposes.
///
/// Network-backed clients live with the embedding application; this crate
/// only needs the interface and the descriptor methods.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Single-prompt completion, used for summarization
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> ModelResult<String>;

    /// Chat completion over an ordered message list
    async fn chat(&self, messages: &[Message], options: &CompletionOptions)
        -> ModelResult<String>;

    /// Maximum context window of the active model, in tokens
    fn context_limit(&self) -> usize;

    /// Vendor behind this client
    fn provider(&self) -> Provider;

    /// Active model identifier
    fn model(&self) -> &str;
}
