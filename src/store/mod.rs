// src/store/mod.rs
pub mod memory;
pub mod writer;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Persisted article row. `article_id` is the derived idempotency key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRecord {
    pub article_id: String,
    pub source_id: String,
    pub source: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub raw_html: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub published_at: DateTime<Utc>,
    pub summary: Option<String>,
}

/// Cross-reference link row, keyed by a hash of `(article_id, url)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkRecord {
    pub link_id: String,
    pub article_id: String,
    pub url: String,
    pub title: String,
    pub domain: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

/// Storage seam. The handle is passed explicitly into every operation that
/// needs it; there is no process-global connection.
///
/// `insert_article` is insert-if-absent: a row that already exists (for
/// example because an overlapping run won the race after our existence
/// check) comes back as `AlreadyExists`, never as an error. `insert_link`
/// has the same on-conflict-ignore contract.
#[async_trait::async_trait]
pub trait ArticleStore: Send + Sync {
    async fn article_exists(&self, article_id: &str) -> Result<bool>;

    async fn insert_article(&self, record: ArticleRecord) -> Result<InsertOutcome>;

    async fn insert_link(&self, record: LinkRecord) -> Result<InsertOutcome>;

    /// Announcement articles with a substantial description and no summary
    /// yet, most recent first.
    async fn articles_missing_summary(&self, limit: usize) -> Result<Vec<ArticleRecord>>;

    async fn set_summary(&self, article_id: &str, summary: &str) -> Result<()>;
}
