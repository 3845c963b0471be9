// src/ingest/scheduler.rs
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::ingest::titles::TitleSource;
use crate::ingest::types::NewsSource;
use crate::ingest::{ingest_blogs, ingest_news, IngestRequest};
use crate::store::ArticleStore;

#[derive(Clone, Copy, Debug)]
pub struct IngestSchedulerCfg {
    pub interval_secs: u64,
    pub days_back: i64,
    pub page_size: u32,
}

/// Spawn the periodic ingestion loop: every tick runs one news invocation
/// and one blog invocation with the configured look-back window. A failed
/// tick is logged and the next tick retries the whole window; idempotent
/// storage makes the overlap harmless.
pub fn spawn_ingest_scheduler(
    cfg: IngestSchedulerCfg,
    source: Arc<dyn NewsSource>,
    store: Arc<dyn ArticleStore>,
    titles: Arc<dyn TitleSource>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(cfg.interval_secs));
        loop {
            ticker.tick().await;
            let req = IngestRequest {
                days_back: Some(cfg.days_back),
                ..Default::default()
            };
            let now = chrono::Utc::now();

            match ingest_news(
                source.as_ref(),
                store.as_ref(),
                titles.as_ref(),
                &req,
                now,
                cfg.page_size,
            )
            .await
            {
                Ok((report, _diag)) => tracing::info!(
                    target: "ingest",
                    inserted = report.inserted,
                    skipped = report.skipped,
                    links_inserted = report.links_inserted,
                    failed = report.failed,
                    "scheduled news ingest tick"
                ),
                Err(e) => tracing::error!(error = %e, "scheduled news ingest failed"),
            }

            match ingest_blogs(
                source.as_ref(),
                store.as_ref(),
                titles.as_ref(),
                &req,
                now,
                cfg.page_size,
            )
            .await
            {
                Ok((report, _diag)) => tracing::info!(
                    target: "ingest",
                    inserted = report.inserted,
                    skipped = report.skipped,
                    failed = report.failed,
                    "scheduled blog ingest tick"
                ),
                Err(e) => tracing::error!(error = %e, "scheduled blog ingest failed"),
            }
        }
    })
}
