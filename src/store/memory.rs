// src/store/memory.rs
use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;

use super::{ArticleRecord, ArticleStore, InsertOutcome, LinkRecord};

/// Minimum description length for an article to be worth summarizing.
const SUMMARY_MIN_DESCRIPTION: usize = 100;

/// In-process `ArticleStore`. Backs local runs and every test; relational
/// backends implement the same trait elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: Mutex<HashMap<String, ArticleRecord>>,
    links: Mutex<HashMap<String, LinkRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn article_count(&self) -> usize {
        self.articles.lock().expect("store mutex poisoned").len()
    }

    pub fn link_count(&self) -> usize {
        self.links.lock().expect("store mutex poisoned").len()
    }

    pub fn article(&self, article_id: &str) -> Option<ArticleRecord> {
        self.articles
            .lock()
            .expect("store mutex poisoned")
            .get(article_id)
            .cloned()
    }

    pub fn link(&self, link_id: &str) -> Option<LinkRecord> {
        self.links
            .lock()
            .expect("store mutex poisoned")
            .get(link_id)
            .cloned()
    }
}

#[async_trait::async_trait]
impl ArticleStore for MemoryStore {
    async fn article_exists(&self, article_id: &str) -> Result<bool> {
        Ok(self
            .articles
            .lock()
            .expect("store mutex poisoned")
            .contains_key(article_id))
    }

    async fn insert_article(&self, record: ArticleRecord) -> Result<InsertOutcome> {
        let mut articles = self.articles.lock().expect("store mutex poisoned");
        if articles.contains_key(&record.article_id) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        articles.insert(record.article_id.clone(), record);
        Ok(InsertOutcome::Inserted)
    }

    async fn insert_link(&self, record: LinkRecord) -> Result<InsertOutcome> {
        let mut links = self.links.lock().expect("store mutex poisoned");
        if links.contains_key(&record.link_id) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        links.insert(record.link_id.clone(), record);
        Ok(InsertOutcome::Inserted)
    }

    async fn articles_missing_summary(&self, limit: usize) -> Result<Vec<ArticleRecord>> {
        let articles = self.articles.lock().expect("store mutex poisoned");
        let mut candidates: Vec<ArticleRecord> = articles
            .values()
            .filter(|a| a.summary.is_none() && a.source == "aws-news")
            .filter(|a| {
                a.description
                    .as_deref()
                    .is_some_and(|d| d.len() > SUMMARY_MIN_DESCRIPTION)
            })
            .cloned()
            .collect();
        candidates.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        candidates.truncate(limit);
        Ok(candidates)
    }

    async fn set_summary(&self, article_id: &str, summary: &str) -> Result<()> {
        let mut articles = self.articles.lock().expect("store mutex poisoned");
        if let Some(rec) = articles.get_mut(article_id) {
            rec.summary = Some(summary.to_string());
        }
        Ok(())
    }
}
