//! Context budgets: how much of a model's window is left for history

use serde::{Deserialize, Serialize};

use crate::ContextError;

/// Tunables for context preparation
///
/// # Example
///
/// ```yaml
/// context:
///   reserve_percent: 30
///   reserve_cap: 1024
///   truncation_chunk_chars: 100
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Share of the context window set aside for the reply (default: 30)
    #[serde(default = "default_reserve_percent")]
    pub reserve_percent: u32,

    /// Upper bound on the reply reservation in tokens (default: 1024)
    #[serde(default = "default_reserve_cap")]
    pub reserve_cap: usize,

    /// Characters removed per step when truncating an oversized message (default: 100)
    #[serde(default = "default_truncation_chunk_chars")]
    pub truncation_chunk_chars: usize,
}

fn default_reserve_percent() -> u32 {
    30
}

fn default_reserve_cap() -> usize {
    1024
}

fn default_truncation_chunk_chars() -> usize {
    100
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            reserve_percent: default_reserve_percent(),
            reserve_cap: default_reserve_cap(),
            truncation_chunk_chars: default_truncation_chunk_chars(),
        }
    }
}

impl ContextConfig {
    pub fn validate(&self) -> Result<(), ContextError> {
        if self.reserve_percent > 100 {
            return Err(ContextError::InvalidConfig(format!(
                "reserve_percent must be at most 100, got {}",
                self.reserve_percent
            )));
        }
        if self.truncation_chunk_chars == 0 {
            return Err(ContextError::InvalidConfig(
                "truncation_chunk_chars must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Token budget for a single model call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContextBudget {
    pub max_context_length: usize,
    pub reserved_response_tokens: usize,
}

impl ContextBudget {
    pub fn new(max_context_length: usize, config: &ContextConfig) -> Self {
        let percent = config.reserve_percent.min(100) as u64;
        let share = (max_context_length as u64 * percent / 100) as usize;

        Self {
            max_context_length,
            reserved_response_tokens: share.min(config.reserve_cap),
        }
    }

    /// Tokens the prompt may occupy once the reply reservation is taken out
    pub fn prompt_capacity(&self) -> usize {
        self.max_context_length
            .saturating_sub(self.reserved_response_tokens)
    }

    /// Tokens left for chat history after the system context and question,
    /// or `None` when those two alone overrun the prompt capacity.
    pub fn available_for_history(&self, base_tokens: usize, question_tokens: usize) -> Option<usize> {
        self.prompt_capacity()
            .checked_sub(base_tokens)?
            .checked_sub(question_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_is_thirty_percent() {
        let budget = ContextBudget::new(1000, &ContextConfig::default());
        assert_eq!(budget.reserved_response_tokens, 300);
        assert_eq!(budget.prompt_capacity(), 700);
    }

    #[test]
    fn test_reservation_is_capped() {
        let budget = ContextBudget::new(128_000, &ContextConfig::default());
        assert_eq!(budget.reserved_response_tokens, 1024);

        let budget = ContextBudget::new(8192, &ContextConfig::default());
        assert_eq!(budget.reserved_response_tokens, 1024);
    }

    #[test]
    fn test_reservation_floors() {
        // 30% of 1001 = 300.3
        let budget = ContextBudget::new(1001, &ContextConfig::default());
        assert_eq!(budget.reserved_response_tokens, 300);
    }

    #[test]
    fn test_available_for_history() {
        let budget = ContextBudget::new(1000, &ContextConfig::default());
        assert_eq!(budget.available_for_history(40, 10), Some(650));
        assert_eq!(budget.available_for_history(700, 0), Some(0));
        assert_eq!(budget.available_for_history(690, 11), None);
    }

    #[test]
    fn test_available_never_exceeds_capacity() {
        for max in [0, 1, 50, 1000, 4096, 200_000] {
            let budget = ContextBudget::new(max, &ContextConfig::default());
            if let Some(available) = budget.available_for_history(0, 0) {
                assert!(available <= max - budget.reserved_response_tokens);
            }
        }
    }

    #[test]
    fn test_validate() {
        assert!(ContextConfig::default().validate().is_ok());

        let config = ContextConfig {
            reserve_percent: 120,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ContextError::InvalidConfig(_))
        ));

        let config = ContextConfig {
            truncation_chunk_chars: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_defaults_from_empty_json() {
        let config: ContextConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ContextConfig::default());
    }
}
