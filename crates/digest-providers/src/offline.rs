//! Offline model client
//!
//! Answers with deterministic canned text instead of calling a vendor. Used
//! when no credentials or transport are available, and by the CLI for dry
//! runs of the summarize and chat flows.

use async_trait::async_trait;
use digest_protocol::{Message, Provider, Role};

use crate::{catalog, CompletionOptions, ModelClient, ModelResult, ProviderConfig};

#[derive(Debug, Clone)]
pub struct OfflineClient {
    provider: Provider,
    model: String,
    context_limit: usize,
}

impl OfflineClient {
    pub fn new(provider: Provider, model: impl Into<String>) -> Self {
        let model = model.into();
        let context_limit = catalog::context_limit(provider, &model, None);
        Self {
            provider,
            model,
            context_limit,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            provider: config.provider(),
            model: config.model_name(),
            context_limit: config.resolved_context_limit(),
        }
    }

    pub fn with_context_limit(mut self, context_limit: usize) -> Self {
        self.context_limit = context_limit;
        self
    }

    fn vendor(&self) -> &'static str {
        self.provider.display_name()
    }
}

fn preview(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect()
}

#[async_trait]
impl ModelClient for OfflineClient {
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> ModelResult<String> {
        tracing::debug!(
            provider = %self.provider,
            max_tokens = options.max_tokens,
            "offline client, returning canned summary"
        );

        let head = preview(prompt, 50);
        let reply = match self.provider {
            Provider::Local => format!(
                "[Mock Local LLM Summary]: For prompt \"{head}...\", this is a local mock response."
            ),
            provider => {
                let points = match provider {
                    Provider::Anthropic => "X, Y, and Z",
                    Provider::Google => "1, 2, and 3",
                    _ => "A, B, and C",
                };
                format!(
                    "[Mock {} Summary]: The content appears to be about: \"{head}...\" Key points include {points}. This is a mock response.",
                    self.vendor()
                )
            }
        };
        Ok(reply)
    }

    async fn chat(&self, messages: &[Message], options: &CompletionOptions) -> ModelResult<String> {
        tracing::debug!(
            provider = %self.provider,
            messages = messages.len(),
            max_tokens = options.max_tokens,
            "offline client, returning canned chat reply"
        );

        let asked = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| preview(&m.content, 30))
            .unwrap_or_else(|| "your query".to_string());

        let reply = match self.provider {
            Provider::Local => format!(
                "[Mock Local LLM Chat]: Regarding \"{asked}...\", this is a local mock chat response."
            ),
            provider => {
                let verdict = match provider {
                    Provider::Anthropic => "quite profound",
                    Provider::Google => "a good question",
                    _ => "interesting",
                };
                format!(
                    "[Mock {} Chat]: You asked about \"{asked}...\". My mock answer is that it's {verdict}.",
                    self.vendor()
                )
            }
        };
        Ok(reply)
    }

    fn context_limit(&self) -> usize {
        self.context_limit
    }

    fn provider(&self) -> Provider {
        self.provider
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_complete() {
        let client = OfflineClient::new(Provider::Anthropic, "claude-2");
        let reply = client
            .complete("Summarize the following article", &CompletionOptions::default())
            .await
            .unwrap();
        assert!(reply.starts_with("[Mock Anthropic Summary]"));
        assert!(reply.contains("X, Y, and Z"));
        assert_eq!(client.context_limit(), 100_000);
    }

    #[tokio::test]
    async fn test_offline_chat_quotes_latest_question() {
        let client = OfflineClient::new(Provider::OpenAI, "gpt-4");
        let messages = vec![
            Message::system("context"),
            Message::user("first question"),
            Message::assistant("first answer"),
            Message::user("What does the author conclude about the topic?"),
        ];
        let reply = client
            .chat(&messages, &CompletionOptions::default())
            .await
            .unwrap();
        assert_eq!(
            reply,
            "[Mock OpenAI Chat]: You asked about \"What does the author conclude ...\". My mock answer is that it's interesting."
        );
    }

    #[tokio::test]
    async fn test_offline_local_chat_without_user_message() {
        let client = OfflineClient::new(Provider::Local, "custom").with_context_limit(2048);
        let reply = client
            .chat(&[Message::system("only system")], &CompletionOptions::default())
            .await
            .unwrap();
        assert!(reply.contains("\"your query...\""));
        assert_eq!(client.context_limit(), 2048);
        assert_eq!(client.model(), "custom");
    }
}
