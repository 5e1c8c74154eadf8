//! Known models and their context windows

use digest_protocol::Provider;
use serde::Serialize;

/// A catalogued model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub provider: Provider,
    pub model: &'static str,
    pub context_limit: usize,
}

const fn model(provider: Provider, model: &'static str, context_limit: usize) -> ModelInfo {
    ModelInfo {
        provider,
        model,
        context_limit,
    }
}

const MODELS: &[ModelInfo] = &[
    model(Provider::OpenAI, "gpt-4", 8192),
    model(Provider::OpenAI, "gpt-4-turbo", 128_000),
    model(Provider::OpenAI, "gpt-3.5-turbo", 4096),
    model(Provider::OpenAI, "gpt-3.5-turbo-16k", 16_384),
    model(Provider::Anthropic, "claude-3-opus-20240229", 200_000),
    model(Provider::Anthropic, "claude-3-sonnet-20240229", 200_000),
    model(Provider::Anthropic, "claude-3-haiku-20240307", 200_000),
    model(Provider::Anthropic, "claude-2.1", 200_000),
    model(Provider::Anthropic, "claude-2", 100_000),
    model(Provider::Anthropic, "claude-instant-1.2", 100_000),
    model(Provider::Google, "gemini-1.0-pro", 32_768),
    model(Provider::Google, "gemini-pro", 32_768),
    model(Provider::Google, "gemini-1.0-ultra", 32_768),
    model(Provider::Google, "gemini-1.5-pro-latest", 1_048_576),
    model(Provider::Google, "gemini-1.5-flash-latest", 1_048_576),
];

/// All catalogued models, optionally restricted to one vendor
pub fn models(provider: Option<Provider>) -> impl Iterator<Item = &'static ModelInfo> {
    MODELS
        .iter()
        .filter(move |info| provider.map_or(true, |p| info.provider == p))
}

/// Model used when the configuration names none
pub fn default_model(provider: Provider) -> &'static str {
    match provider {
        Provider::OpenAI => "gpt-4",
        Provider::Anthropic => "claude-3-opus-20240229",
        Provider::Google => "gemini-1.0-pro",
        Provider::Local => "custom",
    }
}

/// Context window assumed for models missing from the catalog
pub fn fallback_context_limit(provider: Provider) -> usize {
    match provider {
        Provider::OpenAI => 4096,
        Provider::Anthropic => 100_000,
        Provider::Google => 32_768,
        Provider::Local => 4096,
    }
}

/// Context window for `model`, preferring an explicitly configured limit.
///
/// Local servers are never catalogued, so their limit comes from
/// configuration or the fallback.
pub fn context_limit(provider: Provider, model: &str, configured: Option<usize>) -> usize {
    if let Some(limit) = configured {
        return limit;
    }

    models(Some(provider))
        .find(|info| info.model == model)
        .map(|info| info.context_limit)
        .unwrap_or_else(|| fallback_context_limit(provider))
}
