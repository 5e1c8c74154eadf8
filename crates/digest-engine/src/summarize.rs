//! Page summarization

use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use digest_context::{estimate_tokens, truncate_in_chunks, ContextConfig};
use digest_protocol::{ContentKind, PageContent};
use digest_providers::{CompletionOptions, ModelClient};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::EngineError;

const SUMMARY_TEMPERATURE: f32 = 0.3;

const MISSING_TIMESTAMPS_NOTICE: &str =
    "(Timestamps were requested but the model did not provide any.)";

static TIMESTAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\d{2}:\d{2}(:\d{2})?\]").expect("Invalid timestamp regex")
});

/// How long the summary should be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl SummaryLength {
    /// Reply budget for the summary request
    pub fn max_tokens(&self) -> usize {
        match self {
            Self::Short => 300,
            Self::Medium => 600,
            Self::Long => 1200,
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            Self::Short => {
                "Provide a brief summary highlighting only the key points in 2-3 paragraphs."
            }
            Self::Medium => {
                "Provide a comprehensive summary covering the main ideas and key supporting points in 4-6 paragraphs."
            }
            Self::Long => {
                "Provide a detailed summary covering main ideas and significant details in 7-10 paragraphs."
            }
        }
    }
}

impl FromStr for SummaryLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            other => Err(format!("unknown summary length: {other}")),
        }
    }
}

/// Summary preferences
///
/// # Example
///
/// ```yaml
/// summary:
///   length: short
///   include_timestamps: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOptions {
    #[serde(default)]
    pub length: SummaryLength,

    /// Ask for `[HH:MM:SS]` markers on video and audio summaries (default: true)
    #[serde(default = "default_include_timestamps")]
    pub include_timestamps: bool,
}

fn default_include_timestamps() -> bool {
    true
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            length: SummaryLength::default(),
            include_timestamps: default_include_timestamps(),
        }
    }
}

impl SummaryOptions {
    fn wants_timestamps(&self, kind: ContentKind) -> bool {
        self.include_timestamps && kind.is_timed()
    }
}

/// Trim every line and collapse runs of blank lines to one
pub fn preprocess_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = false;

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            blank_run = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push_str(if blank_run { "\n\n" } else { "\n" });
        }
        out.push_str(line);
        blank_run = false;
    }

    out
}

/// Clean up a model summary, flagging missing timestamps on timed media
pub fn postprocess_summary(summary: &str, kind: ContentKind, options: &SummaryOptions) -> String {
    let summary = summary.trim();
    if options.wants_timestamps(kind) && !TIMESTAMP_PATTERN.is_match(summary) {
        tracing::warn!(%kind, "summary has no timestamps although they were requested");
        return format!("{summary}\n\n{MISSING_TIMESTAMPS_NOTICE}");
    }
    summary.to_string()
}

/// Turns page content into a summary with a model client
pub struct Summarizer {
    client: Arc<dyn ModelClient>,
    chunk_chars: usize,
}

impl Summarizer {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self {
            client,
            chunk_chars: ContextConfig::default().truncation_chunk_chars,
        }
    }

    pub fn with_chunk_chars(mut self, chunk_chars: usize) -> Self {
        self.chunk_chars = chunk_chars.max(1);
        self
    }

    /// Instructions sent to the model for `content`
    pub fn build_prompt(content: &str, kind: ContentKind, options: &SummaryOptions) -> String {
        let mut prompt = format!("Summarize the following {kind}:\n\n{content}\n\n");
        prompt.push_str(options.length.instruction());

        if options.wants_timestamps(kind) {
            prompt.push_str(
                " Include timestamps in [HH:MM:SS] format for each key point or section.",
            );
        }

        prompt
    }

    pub async fn summarize(
        &self,
        page: &PageContent,
        options: &SummaryOptions,
    ) -> Result<String, EngineError> {
        let kind = page.kind();
        let content = preprocess_text(page.body());
        if content.is_empty() {
            return Err(EngineError::EmptyContent);
        }

        let max_tokens = options.length.max_tokens();
        let content = self.fit_content(content, kind, options, max_tokens)?;
        let prompt = Self::build_prompt(&content, kind, options);

        tracing::info!(
            provider = %self.client.provider(),
            model = self.client.model(),
            %kind,
            prompt_tokens = estimate_tokens(&prompt),
            max_tokens,
            "requesting summary"
        );

        let summary = self
            .client
            .complete(&prompt, &CompletionOptions::new(max_tokens, SUMMARY_TEMPERATURE))
            .await?;

        Ok(postprocess_summary(&summary, kind, options))
    }

    /// Clip `content` from the end so the prompt and reply fit the window
    fn fit_content(
        &self,
        content: String,
        kind: ContentKind,
        options: &SummaryOptions,
        max_tokens: usize,
    ) -> Result<String, EngineError> {
        let limit = self.client.context_limit();
        let overhead = estimate_tokens(&Self::build_prompt("", kind, options));
        let budget = limit.saturating_sub(max_tokens).saturating_sub(overhead);

        if estimate_tokens(&content) <= budget {
            return Ok(content);
        }

        let clipped = truncate_in_chunks(&content, self.chunk_chars, |candidate| {
            estimate_tokens(candidate) <= budget
        })
        .ok_or(EngineError::ContentTooLong { limit })?;

        tracing::warn!(
            original_tokens = estimate_tokens(&content),
            kept_tokens = estimate_tokens(&clipped),
            limit,
            "content exceeds the context window, clipped for summarization"
        );
        Ok(clipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_tokens_by_length() {
        assert_eq!(SummaryLength::Short.max_tokens(), 300);
        assert_eq!(SummaryLength::Medium.max_tokens(), 600);
        assert_eq!(SummaryLength::Long.max_tokens(), 1200);
        assert_eq!("LONG".parse::<SummaryLength>().unwrap(), SummaryLength::Long);
        assert!("tiny".parse::<SummaryLength>().is_err());
    }

    #[test]
    fn test_summary_options_defaults() {
        let options: SummaryOptions = serde_json::from_str(r#"{"length": "long"}"#).unwrap();
        assert_eq!(options.length, SummaryLength::Long);
        assert!(options.include_timestamps);
    }

    #[test]
    fn test_article_prompt() {
        let prompt = Summarizer::build_prompt(
            "Body",
            ContentKind::Article,
            &SummaryOptions {
                length: SummaryLength::Short,
                include_timestamps: true,
            },
        );
        assert_eq!(
            prompt,
            "Summarize the following article:\n\nBody\n\nProvide a brief summary highlighting only the key points in 2-3 paragraphs."
        );
    }

    #[test]
    fn test_video_prompt_asks_for_timestamps() {
        let options = SummaryOptions::default();
        let prompt = Summarizer::build_prompt("[00:01] hi", ContentKind::Video, &options);
        assert!(prompt.starts_with("Summarize the following video:"));
        assert!(prompt.contains("4-6 paragraphs."));
        assert!(prompt.ends_with("for each key point or section."));

        let options = SummaryOptions {
            include_timestamps: false,
            ..Default::default()
        };
        let prompt = Summarizer::build_prompt("[00:01] hi", ContentKind::Video, &options);
        assert!(!prompt.contains("timestamps"));
    }

    #[test]
    fn test_preprocess_text() {
        let text = "  Title  \n\n\n\n  First line \nSecond line\n\n   \nThird\n\n";
        assert_eq!(
            preprocess_text(text),
            "Title\n\nFirst line\nSecond line\n\nThird"
        );
        assert_eq!(preprocess_text("\n  \n"), "");
    }

    #[test]
    fn test_postprocess_flags_missing_timestamps() {
        let options = SummaryOptions::default();
        let out = postprocess_summary("  A talk.  ", ContentKind::Audio, &options);
        assert_eq!(out, format!("A talk.\n\n{MISSING_TIMESTAMPS_NOTICE}"));

        let out = postprocess_summary("[01:02] Intro", ContentKind::Video, &options);
        assert_eq!(out, "[01:02] Intro");

        let out = postprocess_summary(" Plain. ", ContentKind::Article, &options);
        assert_eq!(out, "Plain.");
    }
}
