//! Digest - Summarize web content and chat about it

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use digest_cli::{Cli, Commands, ContentArgs};
use digest_config::{load_config_or_default, DigestConfig};
use digest_context::ContextManager;
use digest_engine::{grounding_text, ChatSession, EngineError, Summarizer};
use digest_protocol::{HistoryEntry, PageContent, Provider};
use digest_providers::{models, ModelClient, ModelClientBuilder};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let mut config = load_config_or_default(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let mut telemetry = config.telemetry.clone();
    if cli.verbose {
        telemetry = telemetry.with_level("debug");
    }
    digest_telemetry::init_subscriber(&telemetry).context("Failed to initialize logging")?;

    match &cli.command {
        Commands::Summarize { file, content, json, .. } => {
            run_summarize(&config, file, content, *json).await
        }
        Commands::Prepare {
            summary,
            history,
            question,
            content,
        } => run_prepare(&config, summary, history.as_deref(), question, content),
        Commands::Chat { summary, content } => run_chat(&config, summary, content).await,
        Commands::Models => run_models(&config, cli.provider),
    }
}

fn create_client(config: &DigestConfig) -> Result<Arc<dyn ModelClient>> {
    ModelClientBuilder::new()
        .with_config(config.provider.clone())
        .build()
        .context("Failed to create model client")
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

async fn run_summarize(
    config: &DigestConfig,
    file: &Path,
    content: &ContentArgs,
    json_output: bool,
) -> Result<()> {
    let text = read_text(file)?;
    let metadata = content.metadata();
    let page = PageContent {
        transcript: metadata.kind.is_timed().then(|| text.clone()),
        content: text,
        metadata,
    };

    let client = create_client(config)?;
    let summary = Summarizer::new(client)
        .with_chunk_chars(config.context.truncation_chunk_chars)
        .summarize(&page, &config.summary)
        .await?;

    if json_output {
        let output = serde_json::json!({
            "title": page.metadata.title,
            "kind": page.kind(),
            "length": config.summary.length,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} {}", "Summary of".cyan().bold(), page.metadata.title.yellow());
        println!("{}", "─".repeat(50).dimmed());
        println!("{summary}");
    }

    Ok(())
}

fn run_prepare(
    config: &DigestConfig,
    summary: &Path,
    history: Option<&Path>,
    question: &str,
    content: &ContentArgs,
) -> Result<()> {
    let summary = read_text(summary)?;
    let entries: Vec<HistoryEntry> = match history {
        Some(path) => serde_json::from_str(&read_text(path)?)
            .with_context(|| format!("History must be a JSON array: {}", path.display()))?,
        None => Vec::new(),
    };

    let client = create_client(config)?;
    let manager = ContextManager::new(client.context_limit(), client.provider())
        .with_config(config.context.clone())?;

    let prepared = manager.prepare_context(
        &grounding_text(&summary, &content.metadata()),
        &entries,
        question,
    );
    println!("{}", serde_json::to_string_pretty(&prepared)?);

    Ok(())
}

async fn run_chat(config: &DigestConfig, summary: &Path, content: &ContentArgs) -> Result<()> {
    let summary = read_text(summary)?;
    let client = create_client(config)?;

    let mut session = ChatSession::new(client.clone(), &summary, content.metadata())
        .with_context_config(config.context.clone())?
        .with_compaction_policy(config.compaction.clone());

    eprintln!(
        "{} {} ({}, {} tokens). {}",
        "Chatting about".cyan().bold(),
        session.metadata().title.yellow(),
        client.model(),
        client.context_limit(),
        "/reset clears the conversation, /exit quits.".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let question = line.trim();
        match question {
            "" => continue,
            "/exit" | "/quit" => break,
            "/reset" => {
                session.reset();
                println!("{}", "Conversation cleared.".dimmed());
                continue;
            }
            _ => {}
        }

        match session.send_message(question).await {
            Ok(reply) => println!("{} {}", "Assistant:".blue().bold(), reply),
            Err(e @ EngineError::ContentTooLong { .. }) => {
                println!(
                    "{} {}",
                    "Assistant:".blue().bold(),
                    "Your question is too long for this model. Try a shorter one.".red()
                );
                tracing::warn!(error = %e, "chat turn rejected");
            }
            Err(e) => return Err(e.into()),
        }

        if let Some(prepared) = session.last_prepared() {
            tracing::debug!(
                session = %session.id(),
                estimated_tokens = prepared.estimated_tokens,
                omitted = prepared.omitted_messages,
                history = session.history().len(),
                "chat turn complete"
            );
        }
    }

    Ok(())
}

fn run_models(config: &DigestConfig, filter: Option<Provider>) -> Result<()> {
    let active = config.provider.model_name();

    println!("{}", "Known models:".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());

    for info in models(filter) {
        let marker = if info.model == active { "*" } else { " " };
        println!(
            "{} {:<10} {:<28} {:>10}",
            marker.green().bold(),
            info.provider.display_name(),
            info.model,
            info.context_limit
        );
    }

    println!("{}", "─".repeat(60).dimmed());
    println!(
        "{}",
        format!(
            "Active: {} ({} tokens)",
            active,
            config.provider.resolved_context_limit()
        )
        .dimmed()
    );

    Ok(())
}
