// src/api.rs
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::ingest::diagnostics::IngestDiagnostics;
use crate::ingest::titles::TitleSource;
use crate::ingest::types::NewsSource;
use crate::ingest::{self, IngestReport, IngestRequest};
use crate::store::ArticleStore;
use crate::summarize::{generate_summaries, Summarizer, SummaryReport};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn NewsSource>,
    pub store: Arc<dyn ArticleStore>,
    pub titles: Arc<dyn TitleSource>,
    pub summarizer: Arc<dyn Summarizer>,
    pub page_size: u32,
    pub summary_batch_size: usize,
    last_run: Arc<Mutex<Option<LastRun>>>,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct LastRun {
    report: IngestReport,
    diagnostics: IngestDiagnostics,
}

impl AppState {
    pub fn new(
        source: Arc<dyn NewsSource>,
        store: Arc<dyn ArticleStore>,
        titles: Arc<dyn TitleSource>,
        summarizer: Arc<dyn Summarizer>,
        page_size: u32,
        summary_batch_size: usize,
    ) -> Self {
        Self {
            source,
            store,
            titles,
            summarizer,
            page_size,
            summary_batch_size,
            last_run: Arc::new(Mutex::new(None)),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/ingest/news", post(run_news_ingestion))
        .route("/ingest/blogs", post(run_blog_ingestion))
        .route("/summaries/generate", post(run_summary_generation))
        .route("/debug/last-run", get(debug_last_run))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

type ApiError = (StatusCode, String);

/// Trigger one What's New ingestion invocation. An empty body means
/// "default window" (7 days back from now).
async fn run_news_ingestion(
    State(state): State<AppState>,
    body: Option<Json<IngestRequest>>,
) -> Result<Json<IngestReport>, ApiError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    match ingest::ingest_news(
        state.source.as_ref(),
        state.store.as_ref(),
        state.titles.as_ref(),
        &req,
        Utc::now(),
        state.page_size,
    )
    .await
    {
        Ok((report, diagnostics)) => {
            let mut last = state.last_run.lock().expect("last-run mutex poisoned");
            *last = Some(LastRun {
                report: report.clone(),
                diagnostics,
            });
            Ok(Json(report))
        }
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "news ingestion failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("news ingestion failed: {e:#}"),
            ))
        }
    }
}

async fn run_blog_ingestion(
    State(state): State<AppState>,
    body: Option<Json<IngestRequest>>,
) -> Result<Json<IngestReport>, ApiError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    match ingest::ingest_blogs(
        state.source.as_ref(),
        state.store.as_ref(),
        state.titles.as_ref(),
        &req,
        Utc::now(),
        state.page_size,
    )
    .await
    {
        Ok((report, _diagnostics)) => Ok(Json(report)),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "blog ingestion failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("blog ingestion failed: {e:#}"),
            ))
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SummaryRequest {
    batch_size: Option<usize>,
}

async fn run_summary_generation(
    State(state): State<AppState>,
    body: Option<Json<SummaryRequest>>,
) -> Result<Json<SummaryReport>, ApiError> {
    let batch = body
        .and_then(|Json(r)| r.batch_size)
        .unwrap_or(state.summary_batch_size);
    match generate_summaries(state.store.as_ref(), state.summarizer.as_ref(), batch).await {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "summary generation failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("summary generation failed: {e:#}"),
            ))
        }
    }
}

/// Last completed news run with its diagnostics, for operators.
async fn debug_last_run(State(state): State<AppState>) -> Json<Option<LastRun>> {
    let last = state.last_run.lock().expect("last-run mutex poisoned");
    Json(last.clone())
}
