// src/ingest/client.rs
//! HTTP client for the public (undocumented) directory-search API.

use anyhow::{Context, Result};
use metrics::counter;

use crate::ingest::retry::{with_retry, RetryPolicy};
use crate::ingest::tags::TagFormat;
use crate::ingest::types::{ApiEnvelope, NewsSource, PageResult};

pub const DEFAULT_API_BASE: &str = "https://aws.amazon.com/api/dirs/items/search";

const NEWS_DIRECTORY: &str = "whats-new-v2";
const BLOG_DIRECTORY: &str = "blog-posts";
const NEWS_SORT_FIELD: &str = "item.additionalFields.postDateTime";
const BLOG_SORT_FIELD: &str = "item.additionalFields.createdDate";
pub const BLOG_NEWS_CATEGORY_TAG: &str = "blog-posts#category#news";

pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl NewsApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// One directory-search call through the retry executor. Non-success
    /// statuses and envelope parse failures both count as attempts.
    async fn fetch_directory(
        &self,
        directory: &str,
        sort_by: &str,
        tag_id: Option<&str>,
        page: u32,
        page_size: u32,
    ) -> Result<ApiEnvelope> {
        with_retry(&self.retry, || {
            // Pages are 1-based internally; the wire is 0-based.
            let mut req = self
                .http
                .get(&self.base_url)
                .query(&[
                    ("item.directoryId", directory),
                    ("sort_by", sort_by),
                    ("sort_order", "desc"),
                    ("item.locale", "en_US"),
                ])
                .query(&[
                    ("size", page_size.to_string()),
                    ("page", (page - 1).to_string()),
                ]);
            if let Some(tag) = tag_id {
                req = req.query(&[("tags.id", tag)]);
            }
            async move {
                let resp = req
                    .send()
                    .await
                    .context("upstream search request")?
                    .error_for_status()
                    .context("upstream search non-success status")?;
                resp.json::<ApiEnvelope>()
                    .await
                    .context("parsing upstream search envelope")
            }
        })
        .await
    }
}

/// Merge the per-format responses for one (year, page) in the fixed order of
/// `TagFormat::ALL`, so the first occurrence of a repeated source id is
/// always the Standard-format one. A format that failed after retries
/// contributes zero items and must not abort its sibling.
fn merge_format_pages(
    year: i32,
    page: u32,
    results: Vec<(TagFormat, Result<ApiEnvelope>)>,
) -> PageResult {
    let mut merged = PageResult::default();
    for (format, result) in results {
        match result {
            Ok(envelope) => {
                merged.total_hits += envelope.metadata.total_hits;
                merged.format_hits.push((format, envelope.items.len()));
                merged.items.extend(envelope.items);
            }
            Err(e) => {
                tracing::warn!(
                    year,
                    page,
                    format = format.label(),
                    error = %e,
                    "tag format fetch failed"
                );
                counter!("ingest_upstream_errors_total").increment(1);
                merged.format_hits.push((format, 0));
            }
        }
    }
    merged
}

#[async_trait::async_trait]
impl NewsSource for NewsApiClient {
    async fn fetch_news_page(&self, year: i32, page: u32, page_size: u32) -> Result<PageResult> {
        let standard_tag = TagFormat::Standard.tag_id(year);
        let global_tag = TagFormat::Global.tag_id(year);

        // Both encodings are queried unconditionally; the transition period
        // has items reachable under only one of them.
        let (standard, global) = tokio::join!(
            self.fetch_directory(
                NEWS_DIRECTORY,
                NEWS_SORT_FIELD,
                Some(&standard_tag),
                page,
                page_size,
            ),
            self.fetch_directory(
                NEWS_DIRECTORY,
                NEWS_SORT_FIELD,
                Some(&global_tag),
                page,
                page_size,
            ),
        );

        Ok(merge_format_pages(
            year,
            page,
            vec![
                (TagFormat::Standard, standard),
                (TagFormat::Global, global),
            ],
        ))
    }

    async fn fetch_blog_page(&self, page: u32, page_size: u32) -> Result<PageResult> {
        // The blog stream has no sibling query to fall back on; a page that
        // still fails after retries aborts the blog invocation.
        let envelope = self
            .fetch_directory(
                BLOG_DIRECTORY,
                BLOG_SORT_FIELD,
                Some(BLOG_NEWS_CATEGORY_TAG),
                page,
                page_size,
            )
            .await
            .inspect_err(|_| {
                counter!("ingest_upstream_errors_total").increment(1);
            })?;

        Ok(PageResult {
            total_hits: envelope.metadata.total_hits,
            items: envelope.items,
            format_hits: Vec::new(),
        })
    }
}
