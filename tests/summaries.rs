// tests/summaries.rs
use async_trait::async_trait;
use aws_newsroom::store::memory::MemoryStore;
use aws_newsroom::store::{ArticleRecord, ArticleStore};
use aws_newsroom::summarize::{generate_summaries, DisabledSummarizer, Summarizer};
use chrono::{DateTime, Utc};

struct CannedSummarizer;

#[async_trait]
impl Summarizer for CannedSummarizer {
    async fn summarize(&self, title: &str, _content: &str) -> Option<String> {
        Some(format!("tl;dr of {title}"))
    }

    fn name(&self) -> &'static str {
        "canned"
    }
}

fn record(article_id: &str, description: &str, published: &str) -> ArticleRecord {
    ArticleRecord {
        article_id: article_id.to_string(),
        source_id: article_id.to_string(),
        source: "aws-news".to_string(),
        title: format!("title {article_id}"),
        url: format!("https://aws.amazon.com/about-aws/whats-new/{article_id}/"),
        description: Some(description.to_string()),
        raw_html: None,
        author: None,
        category: None,
        published_at: published.parse::<DateTime<Utc>>().unwrap(),
        summary: None,
    }
}

fn long_description() -> String {
    "This launch adds a capability operators have asked about for years. ".repeat(4)
}

#[tokio::test]
async fn summaries_are_written_back_for_eligible_articles() {
    let store = MemoryStore::new();
    store
        .insert_article(record("a1", &long_description(), "2026-01-26T00:00:00Z"))
        .await
        .unwrap();
    store
        .insert_article(record("a2", "too short", "2026-01-25T00:00:00Z"))
        .await
        .unwrap();

    let report = generate_summaries(&store, &CannedSummarizer, 10).await.unwrap();

    assert_eq!(report.status_code, 200);
    assert_eq!(report.processed, 1);
    assert_eq!(report.errors, 0);
    assert_eq!(report.remaining, 0);

    let enriched = store.article("a1").unwrap();
    assert_eq!(enriched.summary.as_deref(), Some("tl;dr of title a1"));
    assert!(store.article("a2").unwrap().summary.is_none());
}

#[tokio::test]
async fn already_summarized_articles_are_not_reprocessed() {
    let store = MemoryStore::new();
    store
        .insert_article(record("a1", &long_description(), "2026-01-26T00:00:00Z"))
        .await
        .unwrap();

    generate_summaries(&store, &CannedSummarizer, 10).await.unwrap();
    let second = generate_summaries(&store, &CannedSummarizer, 10).await.unwrap();

    assert_eq!(second.processed, 0);
    assert_eq!(second.remaining, 0);
}

#[tokio::test]
async fn provider_failure_counts_as_error_and_continues() {
    let store = MemoryStore::new();
    store
        .insert_article(record("a1", &long_description(), "2026-01-26T00:00:00Z"))
        .await
        .unwrap();

    let report = generate_summaries(&store, &DisabledSummarizer, 10).await.unwrap();

    assert_eq!(report.processed, 0);
    assert_eq!(report.errors, 1);
    assert_eq!(report.remaining, 1);
    assert!(store.article("a1").unwrap().summary.is_none());
}

#[tokio::test]
async fn batch_size_caps_selection_most_recent_first() {
    let store = MemoryStore::new();
    store
        .insert_article(record("older", &long_description(), "2026-01-20T00:00:00Z"))
        .await
        .unwrap();
    store
        .insert_article(record("newer", &long_description(), "2026-01-26T00:00:00Z"))
        .await
        .unwrap();

    let report = generate_summaries(&store, &CannedSummarizer, 1).await.unwrap();

    assert_eq!(report.processed, 1);
    assert!(store.article("newer").unwrap().summary.is_some());
    assert!(store.article("older").unwrap().summary.is_none());
}
