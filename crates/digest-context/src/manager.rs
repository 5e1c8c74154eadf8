//! Context manager: assembles the prompt for one chat turn

use digest_protocol::{HistoryEntry, Message, Provider};
use serde::Serialize;

use crate::{ContextBudget, ContextConfig, ContextError, HistoryFitter, TokenEstimator};

/// Fallback system prompt used when the summary does not fit
pub const MINIMAL_SYSTEM_PROMPT: &str = "Answer the following question concisely:";

/// System message of the sentinel context returned when nothing fits
pub const CONTENT_TOO_LONG: &str = "Error: Content too long to process.";

/// How much of the full context made it into a prepared prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextOutcome {
    /// Summary context plus fitted history
    Full,
    /// Summary and history dropped for the minimal prompt
    Minimal,
    /// Not even the question fits; the context is an error sentinel
    TooLong,
}

/// Prompt parts ready for submission to a model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedContext {
    pub system_message: String,
    pub chat_history: Vec<Message>,
    pub current_question: String,
    pub estimated_tokens: usize,
    pub outcome: ContextOutcome,
    /// History entries left out of `chat_history`
    pub omitted_messages: usize,
}

impl PreparedContext {
    fn too_long(estimator: &TokenEstimator) -> Self {
        Self {
            system_message: CONTENT_TOO_LONG.to_string(),
            chat_history: Vec::new(),
            current_question: String::new(),
            estimated_tokens: estimator.estimate(CONTENT_TOO_LONG),
            outcome: ContextOutcome::TooLong,
            omitted_messages: 0,
        }
    }

    /// Callers must check this before submitting; the sentinel carries no question.
    pub fn is_too_long(&self) -> bool {
        self.outcome == ContextOutcome::TooLong
    }

    /// Messages in submission order: system, history, then the question
    pub fn to_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.chat_history.len() + 2);
        messages.push(Message::system(self.system_message.clone()));
        messages.extend(self.chat_history.iter().cloned());
        messages.push(Message::user(self.current_question.clone()));
        messages
    }
}

/// Fits a conversation into a model's context window.
///
/// Build one per turn from the active client's current context limit; the
/// limit changes when the user switches models.
#[derive(Debug, Clone)]
pub struct ContextManager {
    max_context_length: usize,
    estimator: TokenEstimator,
    config: ContextConfig,
}

impl ContextManager {
    pub fn new(max_context_length: usize, provider: Provider) -> Self {
        Self {
            max_context_length,
            estimator: TokenEstimator::new(provider),
            config: ContextConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ContextConfig) -> Result<Self, ContextError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn max_context_length(&self) -> usize {
        self.max_context_length
    }

    pub fn estimator(&self) -> &TokenEstimator {
        &self.estimator
    }

    pub fn budget(&self) -> ContextBudget {
        ContextBudget::new(self.max_context_length, &self.config)
    }

    /// System prompt grounding every answer in the content summary
    pub fn base_context(&self, summary: &str) -> String {
        format!(
            "You are an AI assistant summarizing and answering questions about content.\n\
             Here is a summary of the content:\n\n\
             {summary}\n\n\
             Base your answers on this summary. If you don't know something or it's not \
             covered in the summary, say so rather than making up information. Be concise."
        )
    }

    /// Build the prompt for `question`, keeping as much recent history as fits.
    ///
    /// Never fails. When the summary and question alone overrun the window the
    /// summary is replaced by [`MINIMAL_SYSTEM_PROMPT`]; when even that does not
    /// fit, the [`CONTENT_TOO_LONG`] sentinel is returned. The question itself
    /// is never shortened.
    pub fn prepare_context(
        &self,
        summary: &str,
        history: &[HistoryEntry],
        question: &str,
    ) -> PreparedContext {
        let budget = self.budget();
        let base_context = self.base_context(summary);
        let base_tokens = self.estimator.estimate(&base_context);
        let question_tokens = self.estimator.estimate(question);

        let Some(available) = budget.available_for_history(base_tokens, question_tokens) else {
            tracing::warn!(
                max_context_length = budget.max_context_length,
                reserved = budget.reserved_response_tokens,
                base_tokens,
                question_tokens,
                "base context and question exceed token limit"
            );
            return self.minimal_context(&budget, question, question_tokens, history.len());
        };

        tracing::debug!(
            provider = %self.estimator.provider(),
            max_context_length = budget.max_context_length,
            reserved = budget.reserved_response_tokens,
            base_tokens,
            question_tokens,
            available,
            "preparing chat context"
        );

        let fitted = HistoryFitter::new(self.estimator)
            .with_chunk_chars(self.config.truncation_chunk_chars)
            .fit(history, available);

        PreparedContext {
            system_message: base_context,
            estimated_tokens: base_tokens + question_tokens + fitted.tokens,
            chat_history: fitted.messages,
            current_question: question.to_string(),
            outcome: ContextOutcome::Full,
            omitted_messages: fitted.omitted,
        }
    }

    fn minimal_context(
        &self,
        budget: &ContextBudget,
        question: &str,
        question_tokens: usize,
        history_len: usize,
    ) -> PreparedContext {
        let minimal_tokens = self.estimator.estimate(MINIMAL_SYSTEM_PROMPT);
        if minimal_tokens + question_tokens > budget.prompt_capacity() {
            tracing::warn!(
                question_tokens,
                capacity = budget.prompt_capacity(),
                "question does not fit even with the minimal prompt"
            );
            return PreparedContext::too_long(&self.estimator);
        }

        PreparedContext {
            system_message: MINIMAL_SYSTEM_PROMPT.to_string(),
            chat_history: Vec::new(),
            current_question: question.to_string(),
            estimated_tokens: minimal_tokens + question_tokens,
            outcome: ContextOutcome::Minimal,
            omitted_messages: history_len,
        }
    }
}
