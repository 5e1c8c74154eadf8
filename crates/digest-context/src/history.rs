//! Conversation history storage

use digest_protocol::{HistoryEntry, Message};

use crate::{estimate_tokens, summarize_messages, CompactionPolicy, CompactionResult};

/// Conversation owned by a single chat session.
///
/// The first message is the system message that grounds the conversation.
/// It is never removed; compression only rewrites the messages between it
/// and the most recent exchanges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new(system_message: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_message)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn system_message(&self) -> &Message {
        &self.messages[0]
    }

    /// Everything after the grounding system message
    pub fn exchanges(&self) -> &[Message] {
        &self.messages[1..]
    }

    /// Exchanges in the shape the context manager consumes
    pub fn history_entries(&self) -> Vec<HistoryEntry> {
        digest_protocol::history_entries(self.exchanges())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// A history always holds its system message
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Drop all exchanges, keeping the system message
    pub fn clear_exchanges(&mut self) {
        self.messages.truncate(1);
    }

    /// Estimate total tokens in history
    pub fn estimate_tokens(&self) -> usize {
        self.messages.iter().map(|m| estimate_tokens(&m.content)).sum()
    }

    /// Replace older exchanges with a topic placeholder once the history
    /// grows past the policy threshold for `context_limit`.
    ///
    /// The placeholder takes the position of the messages it replaces, right
    /// after the system message; the `keep_recent` newest messages are kept
    /// verbatim.
    pub fn compress_if_needed(
        &mut self,
        context_limit: usize,
        policy: &CompactionPolicy,
    ) -> Option<CompactionResult> {
        let tokens_before = self.estimate_tokens();
        if !policy.exceeds_threshold(tokens_before, context_limit) {
            return None;
        }

        let messages_before = self.messages.len();
        if messages_before <= policy.keep_recent + 1 {
            return None;
        }

        let recent_start = messages_before - policy.keep_recent;
        let compress_count = recent_start - 1;
        if compress_count < policy.min_compressed.max(1) {
            return None;
        }

        let topics = summarize_messages(&self.messages[1..recent_start]);
        let placeholder = Message::system(format!(
            "{}{}",
            crate::COMPRESSED_HISTORY_PREFIX,
            topics
        ));
        self.messages.splice(1..recent_start, std::iter::once(placeholder));

        let result = CompactionResult {
            tokens_before,
            tokens_after: self.estimate_tokens(),
            messages_before,
            messages_after: self.messages.len(),
            messages_compressed: compress_count,
        };
        tracing::info!(
            tokens_before = result.tokens_before,
            tokens_after = result.tokens_after,
            compressed = result.messages_compressed,
            "compressed conversation history"
        );
        Some(result)
    }
}
