//! Extracted page content handed over by the page scraper

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Kind of content that was extracted from a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Article,
    Video,
    Audio,
    #[default]
    Other,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Other => "content",
        }
    }

    /// Video and audio content is summarized from its transcript
    pub fn is_timed(&self) -> bool {
        matches!(self, Self::Video | Self::Audio)
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown content kind: {0}")]
pub struct UnknownContentKind(pub String);

impl FromStr for ContentKind {
    type Err = UnknownContentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "article" => Ok(Self::Article),
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "other" | "content" | "unknown" => Ok(Self::Other),
            other => Err(UnknownContentKind(other.to_string())),
        }
    }
}

/// Descriptive metadata about the summarized page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMetadata {
    #[serde(default)]
    pub kind: ContentKind,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

fn default_title() -> String {
    "Summarized Content".to_string()
}

impl Default for ContentMetadata {
    fn default() -> Self {
        Self {
            kind: ContentKind::default(),
            title: default_title(),
            author: None,
            url: None,
        }
    }
}

impl ContentMetadata {
    pub fn new(kind: ContentKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Page content extracted for summarization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    #[serde(flatten)]
    pub metadata: ContentMetadata,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

impl PageContent {
    pub fn article(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            metadata: ContentMetadata::new(ContentKind::Article, title),
            content: content.into(),
            transcript: None,
        }
    }

    pub fn video(title: impl Into<String>, transcript: impl Into<String>) -> Self {
        Self {
            metadata: ContentMetadata::new(ContentKind::Video, title),
            content: String::new(),
            transcript: Some(transcript.into()),
        }
    }

    pub fn kind(&self) -> ContentKind {
        self.metadata.kind
    }

    /// Text the summarizer should work from: the transcript for timed media
    /// when one was captured, the page body otherwise.
    pub fn body(&self) -> &str {
        match (&self.transcript, self.kind().is_timed()) {
            (Some(transcript), true) if !transcript.trim().is_empty() => transcript,
            _ => &self.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_kind_parse() {
        assert_eq!("Video".parse::<ContentKind>().unwrap(), ContentKind::Video);
        assert_eq!("unknown".parse::<ContentKind>().unwrap(), ContentKind::Other);
        assert!("podcast".parse::<ContentKind>().is_err());
    }

    #[test]
    fn test_body_prefers_transcript_for_timed_media() {
        let video = PageContent::video("Talk", "[00:01] hello");
        assert_eq!(video.body(), "[00:01] hello");

        let mut article = PageContent::article("Post", "body text");
        article.transcript = Some("ignored".to_string());
        assert_eq!(article.body(), "body text");
    }

    #[test]
    fn test_body_falls_back_to_content_when_transcript_blank() {
        let mut video = PageContent::video("Talk", "   ");
        video.content = "description".to_string();
        assert_eq!(video.body(), "description");
    }

    #[test]
    fn test_page_content_deserialize_flattened() {
        let page: PageContent = serde_json::from_value(json!({
            "kind": "article",
            "title": "Rust ownership",
            "author": "Ferris",
            "content": "Ownership rules..."
        }))
        .unwrap();
        assert_eq!(page.kind(), ContentKind::Article);
        assert_eq!(page.metadata.author.as_deref(), Some("Ferris"));
        assert!(page.transcript.is_none());
    }

    #[test]
    fn test_metadata_defaults() {
        let metadata: ContentMetadata = serde_json::from_value(json!({})).unwrap();
        assert_eq!(metadata.title, "Summarized Content");
        assert_eq!(metadata.kind, ContentKind::Other);
    }
}
