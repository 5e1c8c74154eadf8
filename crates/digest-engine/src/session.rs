//! Chat sessions grounded in a content summary

use std::sync::Arc;

use digest_context::{
    CompactionPolicy, ContextConfig, ContextManager, ConversationHistory, PreparedContext,
};
use digest_protocol::{ContentMetadata, Message, SessionId};
use digest_providers::{CompletionOptions, ModelClient};

use crate::EngineError;

/// Metadata header plus summary; the text every answer is grounded in
pub fn grounding_text(summary: &str, metadata: &ContentMetadata) -> String {
    let mut text = format!("Title: {}\n", metadata.title);
    if let Some(author) = metadata.author.as_deref().filter(|a| !a.trim().is_empty()) {
        text.push_str(&format!("Author/Creator: {author}\n"));
    }
    text.push_str(&format!("Type: {}\n\n{}", metadata.kind, summary.trim()));
    text
}

/// One follow-up conversation about one summarized page.
///
/// Each session owns its history; sessions only share the model client.
pub struct ChatSession {
    id: SessionId,
    client: Arc<dyn ModelClient>,
    metadata: ContentMetadata,
    history: ConversationHistory,
    context_config: ContextConfig,
    compaction: CompactionPolicy,
    options: CompletionOptions,
    last_prepared: Option<PreparedContext>,
}

impl ChatSession {
    pub fn new(client: Arc<dyn ModelClient>, summary: &str, metadata: ContentMetadata) -> Self {
        let history = ConversationHistory::new(grounding_text(summary, &metadata));
        Self {
            id: SessionId::new(),
            client,
            metadata,
            history,
            context_config: ContextConfig::default(),
            compaction: CompactionPolicy::default(),
            options: CompletionOptions::default(),
            last_prepared: None,
        }
    }

    pub fn with_context_config(mut self, config: ContextConfig) -> Result<Self, EngineError> {
        config.validate()?;
        self.context_config = config;
        Ok(self)
    }

    pub fn with_compaction_policy(mut self, policy: CompactionPolicy) -> Self {
        self.compaction = policy;
        self
    }

    pub fn with_completion_options(mut self, options: CompletionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn metadata(&self) -> &ContentMetadata {
        &self.metadata
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Context submitted on the last successful turn
    pub fn last_prepared(&self) -> Option<&PreparedContext> {
        self.last_prepared.as_ref()
    }

    /// Forget the conversation but keep the summary it is grounded in
    pub fn reset(&mut self) {
        self.history.clear_exchanges();
        self.last_prepared = None;
    }

    /// Context that would be submitted for `question` right now.
    ///
    /// Queries the client for its context limit on every call, since the
    /// active model may have changed.
    pub fn prepare(&self, question: &str) -> Result<PreparedContext, EngineError> {
        let manager = ContextManager::new(self.client.context_limit(), self.client.provider())
            .with_config(self.context_config.clone())?;

        Ok(manager.prepare_context(
            &self.history.system_message().content,
            &self.history.history_entries(),
            question,
        ))
    }

    /// Ask a follow-up question and record the exchange.
    ///
    /// Older exchanges may be compressed first. The question and reply are
    /// only recorded once the provider answers.
    pub async fn send_message(&mut self, question: &str) -> Result<String, EngineError> {
        let limit = self.client.context_limit();
        if let Some(result) = self.history.compress_if_needed(limit, &self.compaction) {
            tracing::debug!(
                session = %self.id,
                compressed = result.messages_compressed,
                "history compressed before chat turn"
            );
        }

        let prepared = self.prepare(question)?;
        if prepared.is_too_long() {
            tracing::warn!(session = %self.id, limit, "chat request too large");
            return Err(EngineError::ContentTooLong { limit });
        }

        tracing::debug!(
            session = %self.id,
            outcome = ?prepared.outcome,
            estimated_tokens = prepared.estimated_tokens,
            history = prepared.chat_history.len(),
            omitted = prepared.omitted_messages,
            "submitting chat turn"
        );

        let reply = self
            .client
            .chat(&prepared.to_messages(), &self.options)
            .await?;

        self.history.push(Message::user(question));
        self.history.push(Message::assistant(reply.clone()));
        self.last_prepared = Some(prepared);

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digest_protocol::ContentKind;

    #[test]
    fn test_grounding_text_with_author() {
        let metadata =
            ContentMetadata::new(ContentKind::Video, "Async Rust").with_author("Ferris");
        let text = grounding_text("  Futures are lazy.  ", &metadata);
        assert_eq!(
            text,
            "Title: Async Rust\nAuthor/Creator: Ferris\nType: video\n\nFutures are lazy."
        );
    }

    #[test]
    fn test_grounding_text_without_author() {
        let text = grounding_text("Summary", &ContentMetadata::default());
        assert_eq!(text, "Title: Summarized Content\nType: content\n\nSummary");
    }
}
