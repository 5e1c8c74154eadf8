//! Engine error types

use digest_context::ContextError;
use digest_providers::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no content to summarize")]
    EmptyContent,

    #[error("content too long to process within a {limit} token context window")]
    ContentTooLong { limit: usize },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Context(#[from] ContextError),
}

impl EngineError {
    /// Whether the request should be reported to the user as too large
    pub fn is_request_too_large(&self) -> bool {
        matches!(
            self,
            Self::ContentTooLong { .. } | Self::Provider(ProviderError::ContextExceeded { .. })
        )
    }
}
