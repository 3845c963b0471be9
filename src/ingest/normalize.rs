// src/ingest/normalize.rs
//! Translation boundary from the upstream field bag into domain values.
//! Nothing outside this module interprets `AdditionalFields`.

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Serialize;

use crate::ingest::types::{RawItem, Tag};

/// Anchors pointing here are cross-reference links worth keeping.
const BLOG_URL_MARKER: &str = "aws.amazon.com/blogs/";
/// The blog directory mixes every AWS blog; only the News Blog is ingested.
pub const NEWS_BLOG_PATH: &str = "/blogs/aws/";

const BLOG_CATEGORY_TAG_PREFIX: &str = "blog-posts#category#";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    AwsNews,
    AwsBlog,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::AwsNews => "aws-news",
            Source::AwsBlog => "aws-blog",
        }
    }
}

/// What an item turned out to be once the sparse field bag is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemContent {
    Announcement {
        headline: String,
        url: String,
        body: Option<String>,
    },
    BlogPost {
        title: String,
        url: String,
        excerpt: Option<String>,
    },
}

/// Canonical internal article shape, identical for both streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedArticle {
    pub source_id: String,
    pub source: Source,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub raw_html: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub published_at: DateTime<Utc>,
    pub blog_urls: Vec<String>,
}

/// Classify a raw item by which URL-bearing field group it carries.
/// An item with neither URL is malformed and yields `None`.
pub fn classify(raw: &RawItem) -> Option<ItemContent> {
    let f = &raw.item.additional_fields;
    if let Some(url) = f.headline_url.as_deref().filter(|u| !u.is_empty()) {
        return Some(ItemContent::Announcement {
            headline: f.headline.clone().unwrap_or_default(),
            url: url.to_string(),
            body: f.post_body.clone(),
        });
    }
    if let Some(url) = f.link.as_deref().filter(|u| !u.is_empty()) {
        return Some(ItemContent::BlogPost {
            title: f.title.clone().unwrap_or_default(),
            url: url.to_string(),
            excerpt: f.post_excerpt.clone(),
        });
    }
    None
}

/// Resolved publish date: explicit publish field, then the blog creation
/// field, then the record creation timestamp. `None` when nothing parses.
pub fn published_date(raw: &RawItem) -> Option<DateTime<Utc>> {
    let f = &raw.item.additional_fields;
    f.post_date_time
        .as_deref()
        .and_then(parse_upstream_date)
        .or_else(|| f.created_date.as_deref().and_then(parse_upstream_date))
        .or_else(|| raw.item.date_created.as_deref().and_then(parse_upstream_date))
}

/// The upstream mostly emits RFC 3339; occasionally the offset arrives
/// without a colon (`+0000`), which the fallback pattern accepts.
fn parse_upstream_date(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Strip markup from a fragment. Tag removal alone leaves stray angle
/// brackets behind on nested or unbalanced markup, so those are dropped
/// too; the result is idempotent and never contains `<` or `>`.
pub fn strip_html(html: &str) -> String {
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    let re = RE_TAGS.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());

    let stripped = re.replace_all(html, "");
    stripped
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Body/excerpt HTML to a plain-text description. Entities are decoded
/// first (upstream bodies routinely carry `&amp;` and `&nbsp;`), then
/// markup is stripped. An empty result is `None`, never `Some("")`.
pub fn clean_description(html: Option<&str>) -> Option<String> {
    let html = html?;
    let decoded = html_escape::decode_html_entities(html);
    let text = strip_html(&decoded);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Cross-reference links: anchor hrefs under the AWS blogs path, deduped
/// within the item, order preserved. Links to any other host or to the
/// host outside the blogs path are ignored.
pub fn extract_blog_urls(html: Option<&str>) -> Vec<String> {
    static RE_HREF: OnceCell<Regex> = OnceCell::new();
    let re = RE_HREF
        .get_or_init(|| Regex::new(r#"(?i)<a[^>]+href=["']([^"']+)["'][^>]*>"#).unwrap());

    let Some(html) = html else {
        return Vec::new();
    };

    let mut urls = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for cap in re.captures_iter(html) {
        let url = &cap[1];
        if !url.contains(BLOG_URL_MARKER) {
            continue;
        }
        if seen.insert(url.to_string()) {
            urls.push(url.to_string());
        }
    }
    urls
}

fn category_from_tags(tags: &[Tag]) -> Option<String> {
    tags.iter()
        .find(|t| t.id.starts_with(BLOG_CATEGORY_TAG_PREFIX))
        .map(|t| t.name.clone())
        .filter(|n| !n.is_empty())
}

/// Map a raw item to the canonical article shape. `None` means the item is
/// malformed (no URL, no resolvable date) and is skipped, not an error.
pub fn normalize(raw: &RawItem) -> Option<NormalizedArticle> {
    let published_at = published_date(raw)?;
    let content = classify(raw)?;

    let article = match content {
        ItemContent::Announcement { headline, url, body } => NormalizedArticle {
            source_id: raw.item.id.clone(),
            source: Source::AwsNews,
            title: html_escape::decode_html_entities(&headline).into_owned(),
            url,
            description: clean_description(body.as_deref()),
            blog_urls: extract_blog_urls(body.as_deref()),
            raw_html: body,
            author: None,
            category: None,
            published_at,
        },
        ItemContent::BlogPost { title, url, excerpt } => NormalizedArticle {
            source_id: raw.item.id.clone(),
            source: Source::AwsBlog,
            title: html_escape::decode_html_entities(&title).into_owned(),
            url,
            description: clean_description(excerpt.as_deref()),
            blog_urls: Vec::new(),
            raw_html: None,
            author: raw.item.author.clone(),
            category: category_from_tags(&raw.tags),
            published_at,
        },
    };
    Some(article)
}
