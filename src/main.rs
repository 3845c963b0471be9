//! AWS Newsroom — Binary Entrypoint
//! Boots the Axum HTTP server, wiring the upstream client, the store, and
//! the periodic ingestion scheduler.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use aws_newsroom::api::{self, AppState};
use aws_newsroom::ingest::client::NewsApiClient;
use aws_newsroom::ingest::config::IngestConfig;
use aws_newsroom::ingest::scheduler::{spawn_ingest_scheduler, IngestSchedulerCfg};
use aws_newsroom::ingest::titles::{HttpTitleSource, TitleSource};
use aws_newsroom::ingest::types::NewsSource;
use aws_newsroom::metrics::Metrics;
use aws_newsroom::store::memory::MemoryStore;
use aws_newsroom::store::ArticleStore;
use aws_newsroom::summarize::DisabledSummarizer;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - NEWSROOM_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("NEWSROOM_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ingest=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let cfg = IngestConfig::load().expect("Failed to load newsroom config");
    let metrics = Metrics::init(cfg.scheduler_interval_secs);

    let source: Arc<dyn NewsSource> = Arc::new(NewsApiClient::new(cfg.api_base.clone()));
    let store: Arc<dyn ArticleStore> = Arc::new(MemoryStore::new());
    let titles: Arc<dyn TitleSource> = Arc::new(HttpTitleSource::new());

    let state = AppState::new(
        source.clone(),
        store.clone(),
        titles.clone(),
        Arc::new(DisabledSummarizer),
        cfg.page_size,
        cfg.summary_batch_size,
    );

    if cfg.scheduler_enabled {
        spawn_ingest_scheduler(
            IngestSchedulerCfg {
                interval_secs: cfg.scheduler_interval_secs,
                days_back: cfg.days_back,
                page_size: cfg.page_size,
            },
            source,
            store,
            titles,
        );
    }

    let router = api::create_router(state).merge(metrics.router());

    Ok(router.into())
}
