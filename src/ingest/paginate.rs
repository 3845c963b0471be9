// src/ingest/paginate.rs
//! Pagination control and the year-partition walk.
//!
//! Upstream results are sorted by publish date descending within a
//! partition, but only as a tendency: year tagging around the format
//! transition is loose enough that a page can mix in-window and too-old
//! items. The stop rule is therefore asymmetric: one item at or past the
//! window start keeps pagination going, while stopping requires the whole
//! page to be provably older than the window.

use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};

use crate::ingest::dedup::Deduper;
use crate::ingest::diagnostics::IngestDiagnostics;
use crate::ingest::normalize::{self, NormalizedArticle, NEWS_BLOG_PATH};
use crate::ingest::types::NewsSource;
use crate::ingest::FetchWindow;

/// Drive one partition's pages until a stop condition holds:
/// (a) the page is empty, (b) every dated item on the page is strictly
/// before the window start, or (c) the cumulative raw item count has
/// reached the upstream-reported total. An item with no resolvable date
/// never counts as proof of staleness.
pub async fn fetch_news_year(
    source: &dyn NewsSource,
    year: i32,
    window: &FetchWindow,
    page_size: u32,
    diag: &mut IngestDiagnostics,
) -> Result<Vec<NormalizedArticle>> {
    let mut out = Vec::new();
    let mut dedup = Deduper::new();
    let mut fetched: u64 = 0;

    for page in 1u32.. {
        let result = source.fetch_news_page(year, page, page_size).await?;
        if result.items.is_empty() {
            break;
        }

        diag.record_page(year);
        for (format, hits) in &result.format_hits {
            diag.record_format_hits(year, *format, *hits);
        }
        fetched += result.items.len() as u64;

        let mut all_too_old = true;
        for raw in &result.items {
            let published = normalize::published_date(raw);
            if !matches!(published, Some(d) if d < window.start) {
                all_too_old = false;
            }

            if dedup.is_duplicate(&raw.item.id) {
                diag.record_duplicate();
                continue;
            }

            let Some(published) = published else {
                diag.record_malformed();
                continue;
            };
            diag.record_if_mismatched(year, published.year(), raw, &published.to_rfc3339());

            if published < window.start || published > window.end {
                continue;
            }
            match normalize::normalize(raw) {
                Some(article) => out.push(article),
                None => diag.record_malformed(),
            }
        }

        if all_too_old || fetched >= result.total_hits {
            break;
        }
    }

    Ok(out)
}

/// Walk every partition year the window touches, most recent first, capped
/// at the current year. A partition-loop error aborts the invocation; the
/// per-format and per-item failure scopes have already been absorbed below.
pub async fn fetch_news_in_range(
    source: &dyn NewsSource,
    window: &FetchWindow,
    now: DateTime<Utc>,
    page_size: u32,
    diag: &mut IngestDiagnostics,
) -> Result<Vec<NormalizedArticle>> {
    let first = window.start.year();
    let last = window.end.year().min(now.year());

    let mut articles = Vec::new();
    for year in (first..=last).rev() {
        let mut batch = fetch_news_year(source, year, window, page_size, diag).await?;
        tracing::info!(year, count = batch.len(), "partition fetch complete");
        articles.append(&mut batch);
    }
    Ok(articles)
}

/// The blog stream is a single unpartitioned page walk with the same stop
/// rules, filtered to posts under the News Blog path.
pub async fn fetch_blogs_in_range(
    source: &dyn NewsSource,
    window: &FetchWindow,
    page_size: u32,
    diag: &mut IngestDiagnostics,
) -> Result<Vec<NormalizedArticle>> {
    let mut out = Vec::new();
    let mut dedup = Deduper::new();
    let mut fetched: u64 = 0;

    for page in 1u32.. {
        let result = source.fetch_blog_page(page, page_size).await?;
        if result.items.is_empty() {
            break;
        }
        fetched += result.items.len() as u64;

        let mut all_too_old = true;
        for raw in &result.items {
            let published = normalize::published_date(raw);
            if !matches!(published, Some(d) if d < window.start) {
                all_too_old = false;
            }

            if dedup.is_duplicate(&raw.item.id) {
                diag.record_duplicate();
                continue;
            }

            let Some(url) = raw.item.additional_fields.link.as_deref() else {
                diag.record_malformed();
                continue;
            };
            if !url.contains(NEWS_BLOG_PATH) {
                diag.record_blog_filtered();
                continue;
            }

            let Some(published) = published else {
                diag.record_malformed();
                continue;
            };
            if published < window.start || published > window.end {
                continue;
            }
            match normalize::normalize(raw) {
                Some(article) => out.push(article),
                None => diag.record_malformed(),
            }
        }

        if all_too_old || fetched >= result.total_hits {
            break;
        }
    }

    tracing::info!(
        kept = out.len(),
        filtered = diag.blog_posts_filtered,
        "blog stream fetch complete"
    );
    Ok(out)
}
