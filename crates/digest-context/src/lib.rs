//! Digest Context - Context window management
//!
//! This crate decides what is actually sent to a model on each chat turn:
//! - Token estimation (~4 chars per token)
//! - Response reservation and history budgets
//! - Recency-first history fitting with truncation and omission notes
//! - Conversation history storage and compression

mod budget;
mod compact;
mod error;
mod estimate;
mod fit;
mod history;
mod manager;
mod truncate;

pub use budget::{ContextBudget, ContextConfig};
pub use compact::{
    extract_key_topics, summarize_messages, CompactionPolicy, CompactionResult,
    COMPRESSED_HISTORY_PREFIX,
};
pub use error::ContextError;
pub use estimate::{estimate_tokens, TokenEstimator};
pub use fit::{fit_history, omission_note, FittedHistory, HistoryFitter};
pub use history::ConversationHistory;
pub use manager::{
    ContextManager, ContextOutcome, PreparedContext, CONTENT_TOO_LONG, MINIMAL_SYSTEM_PROMPT,
};
pub use truncate::{truncate_in_chunks, TRUNCATION_MARKER};
