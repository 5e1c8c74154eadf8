//! Token estimation

use digest_protocol::{Message, Provider, Role};

const CHARS_PER_TOKEN: usize = 4;

/// Estimate tokens for a string (~4 chars per token, rounded up).
///
/// This is a deliberate approximation: no provider tokenizer is consulted, so
/// the same text costs the same everywhere. Length is counted in chars.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Token estimator bound to the provider it sizes prompts for.
///
/// The provider is recorded for diagnostics only; every provider shares the
/// same heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenEstimator {
    provider: Provider,
}

impl TokenEstimator {
    pub fn new(provider: Provider) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn estimate(&self, text: &str) -> usize {
        estimate_tokens(text)
    }

    /// Cost of a history message, counted as the `role: content` line it
    /// would occupy in a transcript.
    pub fn estimate_message(&self, message: &Message) -> usize {
        self.estimate_role_content(message.role, &message.content)
    }

    pub fn estimate_role_content(&self, role: Role, content: &str) -> usize {
        let chars = role.as_str().len() + 2 + content.chars().count();
        chars.div_ceil(CHARS_PER_TOKEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_empty() {
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens("a"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens("12345678901234567890"), 5);
    }

    #[test]
    fn test_estimate_tokens_counts_chars_not_bytes() {
        // 4 chars, 12 bytes
        assert_eq!(estimate_tokens("日本語だ"), 1);
    }

    #[test]
    fn test_estimate_matches_formula_for_ascii() {
        for len in 0..64 {
            let text = "x".repeat(len);
            assert_eq!(estimate_tokens(&text), (len + 3) / 4);
        }
    }

    #[test]
    fn test_message_cost_matches_joined_line() {
        let estimator = TokenEstimator::new(Provider::Anthropic);
        let message = Message::assistant("The article covers borrowing.");
        let joined = format!("{}: {}", message.role, message.content);
        assert_eq!(estimator.estimate_message(&message), estimate_tokens(&joined));
    }

    #[test]
    fn test_provider_does_not_change_estimate() {
        let text = "Same text everywhere";
        let estimates: Vec<usize> = Provider::ALL
            .iter()
            .map(|p| TokenEstimator::new(*p).estimate(text))
            .collect();
        assert!(estimates.windows(2).all(|w| w[0] == w[1]));
    }
}
