//! Compression of long-running conversations

use std::collections::HashMap;

use digest_protocol::Message;
use serde::{Deserialize, Serialize};

/// Leading text of the placeholder that replaces compressed messages
pub const COMPRESSED_HISTORY_PREFIX: &str = "The conversation history includes discussion about: ";

const FALLBACK_TOPICS: &str = "earlier questions and answers";
const MAX_TOPICS: usize = 5;
const MIN_TOPIC_CHARS: usize = 4;

const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "also", "answer", "because", "been", "before", "being", "between",
    "both", "could", "does", "doing", "down", "during", "each", "from", "further", "have",
    "having", "here", "into", "just", "more", "most", "much", "only", "other", "over", "please",
    "question", "said", "same", "should", "some", "such", "tell", "than", "that", "their",
    "them", "then", "there", "these", "they", "this", "those", "through", "under", "until",
    "very", "want", "were", "what", "when", "where", "which", "while", "with", "would", "your",
];

/// When and how much of a conversation to compress
///
/// # Example
///
/// ```yaml
/// compaction:
///   threshold_percent: 80
///   keep_recent: 4
///   min_compressed: 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactionPolicy {
    /// Compress once history uses more than this share of the window (default: 80)
    #[serde(default = "default_threshold_percent")]
    pub threshold_percent: u32,

    /// Most recent messages always kept verbatim (default: 4)
    #[serde(default = "default_keep_recent")]
    pub keep_recent: usize,

    /// Minimum run of messages worth replacing with a placeholder (default: 2)
    #[serde(default = "default_min_compressed")]
    pub min_compressed: usize,
}

fn default_threshold_percent() -> u32 {
    80
}

fn default_keep_recent() -> usize {
    4
}

fn default_min_compressed() -> usize {
    2
}

impl Default for CompactionPolicy {
    fn default() -> Self {
        Self {
            threshold_percent: default_threshold_percent(),
            keep_recent: default_keep_recent(),
            min_compressed: default_min_compressed(),
        }
    }
}

impl CompactionPolicy {
    pub fn exceeds_threshold(&self, tokens: usize, context_limit: usize) -> bool {
        tokens as u64 * 100 > context_limit as u64 * self.threshold_percent as u64
    }
}

/// Outcome of a compression pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompactionResult {
    pub tokens_before: usize,
    pub tokens_after: usize,
    pub messages_before: usize,
    pub messages_after: usize,
    pub messages_compressed: usize,
}

/// One-line digest of what a run of messages talked about
pub fn summarize_messages(messages: &[Message]) -> String {
    let text = messages
        .iter()
        .map(|m| {
            m.content
                .strip_prefix(COMPRESSED_HISTORY_PREFIX)
                .unwrap_or(&m.content)
        })
        .collect::<Vec<_>>()
        .join(" ");

    let topics = extract_key_topics(&text, MAX_TOPICS);
    if topics.is_empty() {
        FALLBACK_TOPICS.to_string()
    } else {
        topics.join(", ")
    }
}

/// Most frequent content words in `text`, ties broken by first appearance
pub fn extract_key_topics(text: &str, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

    let words = text
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| w.chars().count() >= MIN_TOPIC_CHARS)
        .map(str::to_lowercase)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()));

    for (position, word) in words.enumerate() {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(String, (usize, usize))> = counts.into_iter().collect();
    ranked.sort_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
        count_b.cmp(count_a).then(first_a.cmp(first_b))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|(word, _)| word)
        .collect()
}
