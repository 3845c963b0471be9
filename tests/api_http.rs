// tests/api_http.rs
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use aws_newsroom::api::{create_router, AppState};
use aws_newsroom::ingest::titles::TitleSource;
use aws_newsroom::ingest::types::{NewsSource, PageResult};
use aws_newsroom::store::memory::MemoryStore;
use aws_newsroom::summarize::DisabledSummarizer;

struct EmptySource;

#[async_trait]
impl NewsSource for EmptySource {
    async fn fetch_news_page(&self, _year: i32, _page: u32, _page_size: u32) -> Result<PageResult> {
        Ok(PageResult::default())
    }

    async fn fetch_blog_page(&self, _page: u32, _page_size: u32) -> Result<PageResult> {
        Ok(PageResult::default())
    }
}

struct NoTitles;

#[async_trait]
impl TitleSource for NoTitles {
    async fn title_for(&self, _url: &str) -> Option<String> {
        None
    }
}

fn test_router() -> axum::Router {
    let state = AppState::new(
        Arc::new(EmptySource),
        Arc::new(MemoryStore::new()),
        Arc::new(NoTitles),
        Arc::new(DisabledSummarizer),
        100,
        100,
    );
    create_router(state)
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_answers_ok() {
    let resp = test_router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn ingest_news_returns_report_shape() {
    let resp = test_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ingest/news")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"daysBack": 2}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["statusCode"], 200);
    assert_eq!(json["source"], "aws-news");
    assert_eq!(json["inserted"], 0);
    assert_eq!(json["skipped"], 0);
    assert!(json["dateRange"]["start"].is_string());
    assert!(json["dateRange"]["end"].is_string());
}

#[tokio::test]
async fn ingest_news_accepts_an_empty_body() {
    let resp = test_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ingest/news")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn invalid_window_maps_to_500() {
    let resp = test_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ingest/news")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"endDate": "2026-01-15T00:00:00Z"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn debug_last_run_reflects_the_previous_invocation() {
    let router = test_router();

    let before = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/debug/last-run")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(body_json(before).await.is_null());

    router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ingest/news")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let after = router
        .oneshot(
            Request::builder()
                .uri("/debug/last-run")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(after).await;
    assert_eq!(json["report"]["statusCode"], 200);
    assert!(json["diagnostics"].is_object());
}

#[tokio::test]
async fn summaries_endpoint_reports_empty_batch() {
    let resp = test_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/summaries/generate")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["processed"], 0);
    assert_eq!(json["remaining"], 0);
}
