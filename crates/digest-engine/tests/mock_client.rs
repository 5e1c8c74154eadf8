//! Mock model client for integration testing
//!
//! Provides a MockModelClient that can be configured with queued responses
//! and tracks every request sent to it.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use digest_protocol::{Message, Provider};
use digest_providers::{CompletionOptions, ModelClient, ModelResult, ProviderError};

/// A queued response
#[derive(Clone)]
pub enum MockResponse {
    Text(String),
    Error(String),
}

/// A recorded request
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Recorded {
    Complete {
        prompt: String,
        options: CompletionOptions,
    },
    Chat {
        messages: Vec<Message>,
        options: CompletionOptions,
    },
}

pub struct MockModelClient {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    recorded: Arc<Mutex<Vec<Recorded>>>,
    context_limit: Arc<Mutex<usize>>,
    provider: Provider,
    model: String,
}

#[allow(dead_code)]
impl MockModelClient {
    pub fn new(context_limit: usize) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            recorded: Arc::new(Mutex::new(Vec::new())),
            context_limit: Arc::new(Mutex::new(context_limit)),
            provider: Provider::OpenAI,
            model: "mock-model".to_string(),
        }
    }

    pub fn queue_text(&self, text: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Text(text.into()));
    }

    pub fn queue_error(&self, message: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockResponse::Error(message.into()));
    }

    /// Simulate the user switching to a model with a different window
    pub fn set_context_limit(&self, limit: usize) {
        *self.context_limit.lock().unwrap() = limit;
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    /// Message lists of every chat call, in order
    pub fn chat_calls(&self) -> Vec<Vec<Message>> {
        self.recorded()
            .into_iter()
            .filter_map(|r| match r {
                Recorded::Chat { messages, .. } => Some(messages),
                Recorded::Complete { .. } => None,
            })
            .collect()
    }

    /// Prompts of every completion call, in order
    pub fn prompts(&self) -> Vec<String> {
        self.recorded()
            .into_iter()
            .filter_map(|r| match r {
                Recorded::Complete { prompt, .. } => Some(prompt),
                Recorded::Chat { .. } => None,
            })
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    fn next_response(&self) -> ModelResult<String> {
        match self.responses.lock().unwrap().pop_front() {
            Some(MockResponse::Text(text)) => Ok(text),
            Some(MockResponse::Error(message)) => Err(ProviderError::InvalidResponse(message)),
            None => Ok("No more queued responses".to_string()),
        }
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> ModelResult<String> {
        self.recorded.lock().unwrap().push(Recorded::Complete {
            prompt: prompt.to_string(),
            options: *options,
        });
        self.next_response()
    }

    async fn chat(&self, messages: &[Message], options: &CompletionOptions) -> ModelResult<String> {
        self.recorded.lock().unwrap().push(Recorded::Chat {
            messages: messages.to_vec(),
            options: *options,
        });
        self.next_response()
    }

    fn context_limit(&self) -> usize {
        *self.context_limit.lock().unwrap()
    }

    fn provider(&self) -> Provider {
        self.provider
    }

    fn model(&self) -> &str {
        &self.model
    }
}
