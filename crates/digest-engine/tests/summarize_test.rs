//! Tests for page summarization against a recording client.

mod mock_client;

use std::sync::Arc;

use digest_context::{estimate_tokens, TRUNCATION_MARKER};
use digest_engine::{EngineError, SummaryLength, SummaryOptions, Summarizer};
use digest_protocol::PageContent;
use digest_providers::ModelClient;
use mock_client::{MockModelClient, Recorded};

fn summarizer(client: &Arc<MockModelClient>) -> Summarizer {
    let dyn_client: Arc<dyn ModelClient> = client.clone();
    Summarizer::new(dyn_client)
}

#[tokio::test]
async fn test_article_summary_request() {
    let client = Arc::new(MockModelClient::new(8192));
    client.queue_text("  Ownership keeps memory safe.  ");

    let page = PageContent::article("Rust", "  Ownership.\n\n\n\n  Borrowing.  ");
    let options = SummaryOptions {
        length: SummaryLength::Short,
        include_timestamps: true,
    };
    let summary = summarizer(&client).summarize(&page, &options).await.unwrap();
    assert_eq!(summary, "Ownership keeps memory safe.");

    let recorded = client.recorded();
    assert_eq!(recorded.len(), 1);
    match &recorded[0] {
        Recorded::Complete { prompt, options } => {
            assert!(prompt.starts_with("Summarize the following article:\n\nOwnership.\n\nBorrowing.\n\n"));
            assert!(!prompt.contains("[HH:MM:SS]"));
            assert_eq!(options.max_tokens, 300);
            assert!((options.temperature - 0.3).abs() < f32::EPSILON);
        }
        other => panic!("expected a completion request, got {other:?}"),
    }
}

#[tokio::test]
async fn test_video_summary_uses_transcript() {
    let client = Arc::new(MockModelClient::new(8192));
    client.queue_text("[00:00:05] Greeting. [00:01:10] Main point.");

    let page = PageContent::video("Talk", "[00:00:05] hello there\n[00:01:10] the main point");
    let summary = summarizer(&client)
        .summarize(&page, &SummaryOptions::default())
        .await
        .unwrap();
    assert_eq!(summary, "[00:00:05] Greeting. [00:01:10] Main point.");

    let prompt = &client.prompts()[0];
    assert!(prompt.starts_with("Summarize the following video:"));
    assert!(prompt.contains("[00:01:10] the main point"));
    assert!(prompt.contains("Include timestamps in [HH:MM:SS] format"));
}

#[tokio::test]
async fn test_missing_timestamps_are_flagged() {
    let client = Arc::new(MockModelClient::new(8192));
    client.queue_text("A talk without markers.");

    let page = PageContent::video("Talk", "[00:00:05] hello");
    let summary = summarizer(&client)
        .summarize(&page, &SummaryOptions::default())
        .await
        .unwrap();

    assert!(summary.starts_with("A talk without markers.\n\n"));
    assert!(summary.contains("did not provide any"));
}

#[tokio::test]
async fn test_empty_content_is_rejected() {
    let client = Arc::new(MockModelClient::new(8192));
    let page = PageContent::article("Blank", " \n\n \t ");

    let err = summarizer(&client)
        .summarize(&page, &SummaryOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::EmptyContent));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_long_content_is_clipped_to_window() {
    let client = Arc::new(MockModelClient::new(1000));
    let page = PageContent::article("Long read", "word ".repeat(2000));
    let options = SummaryOptions {
        length: SummaryLength::Short,
        include_timestamps: false,
    };

    summarizer(&client).summarize(&page, &options).await.unwrap();

    let prompt = &client.prompts()[0];
    assert!(prompt.contains(TRUNCATION_MARKER));
    assert!(estimate_tokens(prompt) + SummaryLength::Short.max_tokens() <= 1000);
}

#[tokio::test]
async fn test_window_too_small_for_reply() {
    let client = Arc::new(MockModelClient::new(200));
    let page = PageContent::article("Any", "Some text worth summarizing.");
    let options = SummaryOptions {
        length: SummaryLength::Long,
        include_timestamps: false,
    };

    let err = summarizer(&client)
        .summarize(&page, &options)
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::ContentTooLong { limit: 200 }));
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_provider_error_propagates() {
    let client = Arc::new(MockModelClient::new(8192));
    client.queue_error("quota exhausted");
    let page = PageContent::article("Any", "Body");

    let err = summarizer(&client)
        .summarize(&page, &SummaryOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Provider(_)));
    assert!(!err.is_request_too_large());
}
