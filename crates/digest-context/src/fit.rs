//! Recency-first history fitting

use std::collections::VecDeque;

use digest_protocol::{HistoryEntry, Message};
use serde::Serialize;

use crate::{truncate_in_chunks, ContextConfig, TokenEstimator};

/// History that survived fitting, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FittedHistory {
    /// Messages to send, including the omission note when one was added
    pub messages: Vec<Message>,
    /// Estimated cost of `messages`
    pub tokens: usize,
    /// Input entries (valid or malformed) that were not kept
    pub omitted: usize,
    /// Malformed entries among `omitted`
    pub skipped: usize,
    /// Whether the newest message was cut to fit
    pub truncated: bool,
    /// Whether an omission note leads `messages`
    pub note_inserted: bool,
}

impl FittedHistory {
    /// Number of conversation messages kept, not counting the omission note
    pub fn retained(&self) -> usize {
        self.messages.len() - usize::from(self.note_inserted)
    }
}

/// System note placed in front of the kept history when older entries were dropped
pub fn omission_note(omitted: usize) -> Message {
    Message::system(format!(
        "[Note: {omitted} earlier messages were omitted due to context length limitations]"
    ))
}

/// Note describing what fitting left out, `None` when nothing was
fn history_note(dropped: usize, skipped: usize) -> Option<Message> {
    match (dropped, skipped) {
        (0, 0) => None,
        (dropped, 0) => Some(omission_note(dropped)),
        (0, skipped) => Some(Message::system(format!(
            "[Note: {skipped} invalid messages were skipped]"
        ))),
        (dropped, skipped) => Some(Message::system(format!(
            "[Note: {dropped} earlier messages were omitted due to context length limitations; {skipped} invalid messages were skipped]"
        ))),
    }
}

/// Selects the longest recent suffix of a conversation that fits a token limit
#[derive(Debug, Clone)]
pub struct HistoryFitter {
    estimator: TokenEstimator,
    chunk_chars: usize,
}

impl HistoryFitter {
    pub fn new(estimator: TokenEstimator) -> Self {
        Self {
            estimator,
            chunk_chars: ContextConfig::default().truncation_chunk_chars,
        }
    }

    pub fn with_chunk_chars(mut self, chunk_chars: usize) -> Self {
        self.chunk_chars = chunk_chars.max(1);
        self
    }

    /// Walk the history newest to oldest, keeping messages while they fit.
    ///
    /// Malformed entries are skipped. Selection stops at the first message
    /// that does not fit, so the kept messages are always a contiguous
    /// suffix. If the newest message alone is too large it is truncated
    /// instead. Never fails and never exceeds `token_limit`.
    pub fn fit(&self, history: &[HistoryEntry], token_limit: usize) -> FittedHistory {
        let mut kept: VecDeque<Message> = VecDeque::new();
        let mut total = 0usize;
        let mut truncated = false;

        for entry in history.iter().rev() {
            let message = match entry {
                HistoryEntry::Message(message) => message,
                HistoryEntry::Malformed(value) => {
                    tracing::warn!(entry = %value, "skipping invalid message in chat history");
                    continue;
                }
            };

            let cost = self.estimator.estimate_message(message);
            if total + cost <= token_limit {
                kept.push_front(message.clone());
                total += cost;
                continue;
            }

            if kept.is_empty() {
                if let Some(message) = self.truncate_to_fit(message, token_limit - total) {
                    total += self.estimator.estimate_message(&message);
                    kept.push_front(message);
                    truncated = true;
                }
            }
            break;
        }

        let skipped = history.iter().filter(|entry| entry.is_malformed()).count();
        let omitted = history.len() - kept.len();
        let dropped = omitted - skipped;
        let mut note_inserted = false;
        if let Some(note) = history_note(dropped, skipped) {
            let note_cost = self.estimator.estimate_message(&note);
            if total + note_cost <= token_limit {
                kept.push_front(note);
                total += note_cost;
                note_inserted = true;
            } else {
                tracing::debug!(
                    dropped,
                    skipped,
                    note_cost,
                    "omission note does not fit, dropping it"
                );
            }
        }

        FittedHistory {
            messages: kept.into(),
            tokens: total,
            omitted,
            skipped,
            truncated,
            note_inserted,
        }
    }

    fn truncate_to_fit(&self, message: &Message, remaining: usize) -> Option<Message> {
        if remaining == 0 {
            return None;
        }

        let content = truncate_in_chunks(&message.content, self.chunk_chars, |candidate| {
            self.estimator.estimate_role_content(message.role, candidate) <= remaining
        })?;

        tracing::warn!(
            original_chars = message.content.chars().count(),
            kept_chars = content.chars().count(),
            "most recent message exceeds the history budget, truncated"
        );
        Some(Message::new(message.role, content))
    }
}

/// Fit `history` into `token_limit` with default settings
pub fn fit_history(history: &[HistoryEntry], token_limit: usize) -> FittedHistory {
    HistoryFitter::new(TokenEstimator::default()).fit(history, token_limit)
}
