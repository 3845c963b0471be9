// src/ingest/diagnostics.rs
use std::collections::BTreeMap;

use serde::Serialize;

use crate::ingest::tags::{extract_year_tags, TagFormat};
use crate::ingest::types::RawItem;

/// Per-invocation observability accumulator. Created fresh for every run,
/// logged and exposed on the debug route, never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestDiagnostics {
    /// Keyed by partition year.
    pub years: BTreeMap<i32, YearDiagnostics>,
    pub duplicates_removed: usize,
    pub malformed_skipped: usize,
    /// Blog-directory posts dropped because they live outside the News Blog.
    pub blog_posts_filtered: usize,
    /// Items whose resolved publish year disagrees with the partition tag
    /// they were found under.
    pub mismatched_year_tags: Vec<MismatchedItem>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct YearDiagnostics {
    /// Items each tag encoding yielded across all pages of the partition.
    pub format_hits: BTreeMap<&'static str, usize>,
    pub pages_fetched: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MismatchedItem {
    pub source_id: String,
    pub headline: String,
    pub published_at: String,
    pub actual_year: i32,
    pub tagged_years: Vec<i32>,
}

impl IngestDiagnostics {
    pub fn record_format_hits(&mut self, year: i32, format: TagFormat, hits: usize) {
        *self
            .years
            .entry(year)
            .or_default()
            .format_hits
            .entry(format.label())
            .or_insert(0) += hits;
    }

    pub fn record_page(&mut self, year: i32) {
        self.years.entry(year).or_default().pages_fetched += 1;
    }

    pub fn record_duplicate(&mut self) {
        self.duplicates_removed += 1;
    }

    pub fn record_malformed(&mut self) {
        self.malformed_skipped += 1;
    }

    pub fn record_blog_filtered(&mut self) {
        self.blog_posts_filtered += 1;
    }

    /// Note an item found under `queried_year` whose own date says otherwise.
    pub fn record_if_mismatched(
        &mut self,
        queried_year: i32,
        actual_year: i32,
        raw: &RawItem,
        published_at: &str,
    ) {
        if actual_year == queried_year {
            return;
        }
        self.mismatched_year_tags.push(MismatchedItem {
            source_id: raw.item.id.clone(),
            headline: raw
                .item
                .additional_fields
                .headline
                .clone()
                .unwrap_or_default(),
            published_at: published_at.to_string(),
            actual_year,
            tagged_years: extract_year_tags(&raw.tags),
        });
    }
}
