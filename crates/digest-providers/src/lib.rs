//! Digest Providers - Model client abstraction
//!
//! This crate defines the capability interface every LLM vendor is driven
//! through, plus the pieces that do not need a network:
//! - The model catalog (context limits per vendor and model)
//! - Provider configuration and client construction
//! - An offline client with deterministic canned replies

mod catalog;
mod client;
mod config;
mod error;
mod offline;
mod traits;

pub use catalog::{context_limit, default_model, fallback_context_limit, models, ModelInfo};
pub use client::ModelClientBuilder;
pub use config::ProviderConfig;
pub use error::ProviderError;
pub use offline::OfflineClient;
pub use traits::{CompletionOptions, ModelClient, ModelResult};
