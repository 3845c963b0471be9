// src/ingest/types.rs
use anyhow::Result;
use serde::Deserialize;

use crate::ingest::tags::TagFormat;

/// Envelope returned by the `aws.amazon.com/api/dirs/items/search` endpoint.
/// The API is undocumented; every field the pipeline does not strictly need
/// is optional so a schema drift upstream degrades instead of failing.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub metadata: ApiMetadata,
    #[serde(default)]
    pub items: Vec<RawItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetadata {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub total_hits: u64,
}

/// One upstream record: the item body plus its directory tags.
///
/// `item.id` is stable for a logical item but may repeat within a fetch
/// batch: the same announcement is reachable through more than one year-tag
/// encoding and through overlapping pages.
#[derive(Debug, Clone, Deserialize)]
pub struct RawItem {
    pub item: ItemBody,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub date_updated: Option<String>,
    #[serde(default)]
    pub additional_fields: AdditionalFields,
}

/// Sparse field bag shared by both directories. Announcements carry the
/// `headline*`/`post*` fields, blog posts the `title`/`link`/`postExcerpt`
/// group; the normalizer is the only place allowed to interpret this.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalFields {
    // What's New announcements
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub headline_url: Option<String>,
    #[serde(default)]
    pub post_body: Option<String>,
    #[serde(default)]
    pub post_date_time: Option<String>,
    #[serde(default)]
    pub post_summary: Option<String>,
    // Blog posts
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub post_excerpt: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag_namespace_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One fetched page after the per-format fan-out has been merged.
///
/// `items` preserves upstream order, Standard-format results before Global
/// ones, so downstream first-occurrence dedup is deterministic. `total_hits`
/// is the sum the formats report and `format_hits` feeds diagnostics.
#[derive(Debug, Clone, Default)]
pub struct PageResult {
    pub total_hits: u64,
    pub items: Vec<RawItem>,
    pub format_hits: Vec<(TagFormat, usize)>,
}

/// Seam between the pagination layer and the upstream API. Implemented by
/// `NewsApiClient` in production and by in-test mocks.
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    /// One page of What's New announcements for a partition year.
    async fn fetch_news_page(&self, year: i32, page: u32, page_size: u32) -> Result<PageResult>;

    /// One page of the news-category blog stream (no year partitioning).
    async fn fetch_blog_page(&self, page: u32, page_size: u32) -> Result<PageResult>;
}
