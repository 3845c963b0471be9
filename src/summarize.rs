// src/summarize.rs
//! AI summary enrichment. The model call itself lives behind `Summarizer`;
//! this module only owns batch selection, truncation, and write-back.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::store::ArticleStore;

/// Roughly 1000 tokens worth of input.
pub const MAX_CONTENT_CHARS: usize = 4000;

/// Opaque text-in/text-out summarization provider. `None` covers every
/// failure mode (provider disabled, call failed, empty completion); the
/// enrichment pass treats it as "try again some other run".
#[async_trait::async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, title: &str, content: &str) -> Option<String>;

    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Default when no provider is configured.
pub struct DisabledSummarizer;

#[async_trait::async_trait]
impl Summarizer for DisabledSummarizer {
    async fn summarize(&self, _title: &str, _content: &str) -> Option<String> {
        None
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Cap content before it reaches the provider.
pub fn truncate_content(content: &str) -> String {
    if content.chars().count() > MAX_CONTENT_CHARS {
        let mut out: String = content.chars().take(MAX_CONTENT_CHARS).collect();
        out.push_str("...");
        out
    } else {
        content.to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub status_code: u16,
    pub processed: usize,
    pub errors: usize,
    pub remaining: usize,
}

/// Summarize up to `batch_size` articles that still lack one. Per-article
/// failures are counted and the batch continues.
pub async fn generate_summaries(
    store: &dyn ArticleStore,
    summarizer: &dyn Summarizer,
    batch_size: usize,
) -> Result<SummaryReport> {
    let articles = store
        .articles_missing_summary(batch_size)
        .await
        .context("selecting articles needing summaries")?;
    tracing::info!(
        count = articles.len(),
        provider = summarizer.name(),
        "generating summaries"
    );

    let mut processed = 0;
    let mut errors = 0;
    for article in &articles {
        let content = truncate_content(article.description.as_deref().unwrap_or_default());
        match summarizer.summarize(&article.title, &content).await {
            Some(summary) => match store.set_summary(&article.article_id, &summary).await {
                Ok(()) => processed += 1,
                Err(e) => {
                    tracing::warn!(
                        article_id = %article.article_id,
                        error = %e,
                        "failed to store summary"
                    );
                    errors += 1;
                }
            },
            None => errors += 1,
        }
    }

    Ok(SummaryReport {
        status_code: 200,
        processed,
        errors,
        remaining: articles.len() - processed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_caps_and_marks() {
        let long = "x".repeat(MAX_CONTENT_CHARS + 50);
        let out = truncate_content(&long);
        assert_eq!(out.chars().count(), MAX_CONTENT_CHARS + 3);
        assert!(out.ends_with("..."));

        let short = "short enough";
        assert_eq!(truncate_content(short), short);
    }
}
