//! Digest Engine - Summaries and grounded chat
//!
//! - [`Summarizer`] turns extracted page content into a summary
//! - [`ChatSession`] answers follow-up questions about that summary, keeping
//!   each turn inside the model's context window

mod error;
mod session;
mod summarize;

pub use error::EngineError;
pub use session::{grounding_text, ChatSession};
pub use summarize::{postprocess_summary, preprocess_text, SummaryLength, SummaryOptions, Summarizer};
