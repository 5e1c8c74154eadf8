//! Digest Protocol - Shared types for the Digest summarizer
//!
//! This crate defines the fundamental types used across the workspace:
//! - Message types for model communication
//! - Provider identifiers
//! - Page content handed to the summarizer

mod content;
mod messages;
mod types;

pub use content::*;
pub use messages::*;
pub use types::*;
