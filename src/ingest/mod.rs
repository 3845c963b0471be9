// src/ingest/mod.rs
pub mod client;
pub mod config;
pub mod dedup;
pub mod diagnostics;
pub mod normalize;
pub mod paginate;
pub mod retry;
pub mod scheduler;
pub mod tags;
pub mod titles;
pub mod types;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::ingest::diagnostics::IngestDiagnostics;
use crate::ingest::titles::TitleSource;
use crate::ingest::types::NewsSource;
use crate::store::writer::store_articles;
use crate::store::ArticleStore;

pub const DEFAULT_DAYS_BACK: i64 = 7;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_items_total", "Articles fetched in-window.");
        describe_counter!("ingest_inserted_total", "Articles newly stored.");
        describe_counter!(
            "ingest_skipped_total",
            "Articles skipped as already stored."
        );
        describe_counter!(
            "ingest_dedup_total",
            "Raw items removed as cross-format/cross-page duplicates."
        );
        describe_counter!(
            "ingest_upstream_errors_total",
            "Upstream fetches that failed after retries."
        );
        describe_counter!(
            "ingest_store_failures_total",
            "Per-article or per-link storage failures."
        );
        describe_counter!("ingest_runs_total", "Completed ingestion invocations.");
        describe_histogram!("ingest_fetch_ms", "Upstream fetch phase in milliseconds.");
        describe_gauge!(
            "ingest_pipeline_last_run_ts",
            "Unix ts when the ingest pipeline last ran."
        );
    });
}

/// Requested ingestion range: `[start, end]`, `start <= end`. Built once per
/// invocation and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FetchWindow {
    /// Derive the window from the invocation payload. Exactly one of an
    /// explicit `startDate` or a `daysBack` offset (default 7) anchors the
    /// start; `endDate` without `startDate` is rejected.
    pub fn from_request(req: &IngestRequest, now: DateTime<Utc>) -> Result<Self> {
        if req.end_date.is_some() && req.start_date.is_none() {
            bail!("endDate requires startDate to be specified");
        }

        let end = match req.end_date.as_deref() {
            Some(s) => parse_bound(s)?,
            None => now,
        };
        let start = match req.start_date.as_deref() {
            Some(s) => parse_bound(s)?,
            None => now - Duration::days(req.days_back.unwrap_or(DEFAULT_DAYS_BACK)),
        };

        if start > end {
            bail!("window start {start} is after end {end}");
        }
        Ok(Self { start, end })
    }
}

fn parse_bound(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .with_context(|| format!("parsing window bound {s:?}"))
}

/// Invocation payload, camelCase on the wire for the scheduler/handler layer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IngestRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub days_back: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    fn from_window(w: &FetchWindow) -> Self {
        Self {
            start: w.start.to_rfc3339_opts(SecondsFormat::Millis, true),
            end: w.end.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Operator-visible outcome of one ingestion invocation. Counts are always
/// reported, also on partial success.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub status_code: u16,
    pub source: &'static str,
    pub total_fetched: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub links_inserted: usize,
    pub failed: usize,
    pub date_range: DateRange,
}

/// Run one What's New ingestion invocation: window → partition walk →
/// normalize/dedup/filter → idempotent store. Returns the report plus the
/// run's diagnostics.
pub async fn ingest_news(
    source: &dyn NewsSource,
    store: &dyn ArticleStore,
    titles: &dyn TitleSource,
    req: &IngestRequest,
    now: DateTime<Utc>,
    page_size: u32,
) -> Result<(IngestReport, IngestDiagnostics)> {
    ensure_metrics_described();

    let window = FetchWindow::from_request(req, now)?;
    tracing::info!(start = %window.start, end = %window.end, "starting news ingestion");

    let t0 = std::time::Instant::now();
    let mut diag = IngestDiagnostics::default();
    let articles =
        paginate::fetch_news_in_range(source, &window, now, page_size, &mut diag).await?;
    histogram!("ingest_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

    let total_fetched = articles.len();
    let stored = store_articles(store, titles, articles).await;
    record_run_metrics(total_fetched, &diag, stored.inserted, stored.skipped, stored.failed, now);

    if !diag.mismatched_year_tags.is_empty() {
        tracing::warn!(
            mismatched = diag.mismatched_year_tags.len(),
            detail = %serde_json::to_string(&diag.mismatched_year_tags).unwrap_or_default(),
            "items found under a year tag their own date disagrees with"
        );
    }
    tracing::info!(
        total_fetched,
        inserted = stored.inserted,
        skipped = stored.skipped,
        links_inserted = stored.links_inserted,
        failed = stored.failed,
        duplicates = diag.duplicates_removed,
        "news ingestion completed"
    );

    Ok((
        IngestReport {
            status_code: 200,
            source: "aws-news",
            total_fetched,
            inserted: stored.inserted,
            skipped: stored.skipped,
            links_inserted: stored.links_inserted,
            failed: stored.failed,
            date_range: DateRange::from_window(&window),
        },
        diag,
    ))
}

/// Blog-stream variant: one unpartitioned walk, no cross-reference links.
pub async fn ingest_blogs(
    source: &dyn NewsSource,
    store: &dyn ArticleStore,
    titles: &dyn TitleSource,
    req: &IngestRequest,
    now: DateTime<Utc>,
    page_size: u32,
) -> Result<(IngestReport, IngestDiagnostics)> {
    ensure_metrics_described();

    let window = FetchWindow::from_request(req, now)?;
    tracing::info!(start = %window.start, end = %window.end, "starting blog ingestion");

    let t0 = std::time::Instant::now();
    let mut diag = IngestDiagnostics::default();
    let articles = paginate::fetch_blogs_in_range(source, &window, page_size, &mut diag).await?;
    histogram!("ingest_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

    let total_fetched = articles.len();
    let stored = store_articles(store, titles, articles).await;
    record_run_metrics(total_fetched, &diag, stored.inserted, stored.skipped, stored.failed, now);

    tracing::info!(
        total_fetched,
        inserted = stored.inserted,
        skipped = stored.skipped,
        failed = stored.failed,
        "blog ingestion completed"
    );

    Ok((
        IngestReport {
            status_code: 200,
            source: "aws-blog",
            total_fetched,
            inserted: stored.inserted,
            skipped: stored.skipped,
            links_inserted: stored.links_inserted,
            failed: stored.failed,
            date_range: DateRange::from_window(&window),
        },
        diag,
    ))
}

fn record_run_metrics(
    total_fetched: usize,
    diag: &IngestDiagnostics,
    inserted: usize,
    skipped: usize,
    failed: usize,
    now: DateTime<Utc>,
) {
    counter!("ingest_items_total").increment(total_fetched as u64);
    counter!("ingest_dedup_total").increment(diag.duplicates_removed as u64);
    counter!("ingest_inserted_total").increment(inserted as u64);
    counter!("ingest_skipped_total").increment(skipped as u64);
    counter!("ingest_store_failures_total").increment(failed as u64);
    counter!("ingest_runs_total").increment(1);
    gauge!("ingest_pipeline_last_run_ts").set(now.timestamp().max(0) as f64);
}
