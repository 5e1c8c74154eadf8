//! CLI commands

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use digest_config::DigestConfig;
use digest_engine::SummaryLength;
use digest_protocol::{ContentKind, ContentMetadata, Provider};

/// Digest - Summarize web content and chat about it
#[derive(Parser, Debug)]
#[command(name = "digest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: digest.* in the working directory, then ~/.config/digest)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Provider to use (openai, anthropic, google, local)
    #[arg(short, long, global = true)]
    pub provider: Option<Provider>,

    /// Model to use (e.g., gpt-4-turbo, claude-3-haiku-20240307)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Context window in tokens, overriding the model catalog
    #[arg(long, global = true)]
    pub context_limit: Option<usize>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize an article or transcript file
    Summarize {
        /// Text file holding the page body or transcript
        file: PathBuf,

        #[command(flatten)]
        content: ContentArgs,

        /// Summary length (short, medium, long)
        #[arg(long)]
        length: Option<SummaryLength>,

        /// Do not ask for timestamps on video and audio summaries
        #[arg(long)]
        no_timestamps: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the context a chat turn would submit, as JSON
    Prepare {
        /// File holding the summary the chat is grounded in
        #[arg(long)]
        summary: PathBuf,

        /// JSON array of earlier `{"role", "content"}` messages, oldest first
        #[arg(long)]
        history: Option<PathBuf>,

        /// The follow-up question
        #[arg(long)]
        question: String,

        #[command(flatten)]
        content: ContentArgs,
    },

    /// Ask questions about a summary, one per line on stdin
    Chat {
        /// File holding the summary the chat is grounded in
        #[arg(long)]
        summary: PathBuf,

        #[command(flatten)]
        content: ContentArgs,
    },

    /// List known models and their context windows
    Models,
}

/// What the summarized content is
#[derive(Args, Debug, Clone)]
pub struct ContentArgs {
    /// Content title
    #[arg(long)]
    pub title: Option<String>,

    /// Author or channel
    #[arg(long)]
    pub author: Option<String>,

    /// Content type (article, video, audio, other)
    #[arg(long, default_value = "article")]
    pub kind: ContentKind,
}

impl ContentArgs {
    pub fn metadata(&self) -> ContentMetadata {
        let mut metadata = match &self.title {
            Some(title) => ContentMetadata::new(self.kind, title.clone()),
            None => ContentMetadata {
                kind: self.kind,
                ..Default::default()
            },
        };
        if let Some(author) = &self.author {
            metadata = metadata.with_author(author.clone());
        }
        metadata
    }
}

impl Cli {
    /// Apply command-line flags on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut DigestConfig) {
        if let Some(provider) = self.provider {
            if config.provider.provider() != provider {
                // a model from the file belongs to the old vendor
                config.provider.model = None;
            }
            config.provider.kind = provider.to_string();
        }
        if let Some(model) = &self.model {
            config.provider.model = Some(model.clone());
        }
        if let Some(limit) = self.context_limit {
            config.provider.context_limit = Some(limit);
        }
        if let Commands::Summarize {
            length,
            no_timestamps,
            ..
        } = &self.command
        {
            if let Some(length) = length {
                config.summary.length = *length;
            }
            if *no_timestamps {
                config.summary.include_timestamps = false;
            }
        }
    }
}
