// src/store/writer.rs
//! Idempotent storage of normalized articles and their cross-reference
//! links. Per-article and per-link failures are logged and counted; the
//! batch always runs to the end.

use sha2::{Digest, Sha256};

use crate::ingest::normalize::{NormalizedArticle, Source};
use crate::ingest::titles::TitleSource;

use super::{ArticleRecord, ArticleStore, InsertOutcome, LinkRecord};

const LINK_DOMAIN: &str = "aws.amazon.com";
const DERIVED_ID_LEN: usize = 32;

/// Deterministic storage key: sha256 hex of the identity-bearing input,
/// truncated. Stable across runs, so re-ingesting the same item is a no-op.
pub fn derive_id(identity: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(identity.as_bytes());
    let digest = hasher.finalize();

    let mut out = String::with_capacity(DERIVED_ID_LEN);
    for b in digest.iter().take(DERIVED_ID_LEN / 2) {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Announcements are identified by their upstream source id; blog posts by
/// their URL (the blog directory recycles ids across feeds).
pub fn derive_article_id(article: &NormalizedArticle) -> String {
    match article.source {
        Source::AwsNews => derive_id(&article.source_id),
        Source::AwsBlog => derive_id(&article.url),
    }
}

pub fn derive_link_id(article_id: &str, url: &str) -> String {
    derive_id(&format!("{article_id}:{url}"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StoreReport {
    pub inserted: usize,
    pub skipped: usize,
    pub links_inserted: usize,
    pub failed: usize,
}

/// Write a batch. For each article: existence check → skip, else
/// conflict-safe insert; a lost race surfaces as `AlreadyExists` and counts
/// as skipped. Cross-reference links are resolved and written only for
/// newly inserted articles.
pub async fn store_articles(
    store: &dyn ArticleStore,
    titles: &dyn TitleSource,
    articles: Vec<NormalizedArticle>,
) -> StoreReport {
    let mut report = StoreReport::default();

    for article in articles {
        let article_id = derive_article_id(&article);

        match store.article_exists(&article_id).await {
            Ok(true) => {
                report.skipped += 1;
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::error!(article_id = %article_id, error = %e, "existence check failed");
                report.failed += 1;
                continue;
            }
        }

        let blog_urls = article.blog_urls.clone();
        let record = ArticleRecord {
            article_id: article_id.clone(),
            source_id: article.source_id,
            source: article.source.as_str().to_string(),
            title: article.title,
            url: article.url,
            description: article.description,
            raw_html: article.raw_html,
            author: article.author,
            category: article.category,
            published_at: article.published_at,
            summary: None,
        };

        match store.insert_article(record).await {
            Ok(InsertOutcome::Inserted) => report.inserted += 1,
            Ok(InsertOutcome::AlreadyExists) => {
                report.skipped += 1;
                continue;
            }
            Err(e) => {
                tracing::error!(article_id = %article_id, error = %e, "failed to store article");
                report.failed += 1;
                continue;
            }
        }

        store_links(store, titles, &article_id, &blog_urls, &mut report).await;
    }

    tracing::info!(
        inserted = report.inserted,
        skipped = report.skipped,
        links_inserted = report.links_inserted,
        failed = report.failed,
        "storage completed"
    );
    report
}

async fn store_links(
    store: &dyn ArticleStore,
    titles: &dyn TitleSource,
    article_id: &str,
    blog_urls: &[String],
    report: &mut StoreReport,
) {
    for url in blog_urls {
        // No title, no link; the enrichment is what makes the row useful.
        let Some(title) = titles.title_for(url).await else {
            continue;
        };

        let record = LinkRecord {
            link_id: derive_link_id(article_id, url),
            article_id: article_id.to_string(),
            url: url.clone(),
            title,
            domain: LINK_DOMAIN.to_string(),
        };
        match store.insert_link(record).await {
            Ok(InsertOutcome::Inserted) => report.links_inserted += 1,
            Ok(InsertOutcome::AlreadyExists) => {}
            Err(e) => {
                tracing::warn!(article_id = %article_id, url = %url, error = %e, "failed to store link");
                report.failed += 1;
            }
        }
    }
}
