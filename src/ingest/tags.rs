// src/ingest/tags.rs
//! Year-tag encodings used by the upstream directory API.
//!
//! The API has changed how it spells "this item belongs to year Y" without
//! migrating old items, and real-world tagging around the transition is
//! inconsistent: an item can be reachable only under the new encoding while
//! still belonging to the target year, or carry the wrong year outright.
//! Every partition query therefore tries all known encodings and merges.

use once_cell::sync::OnceCell;
use regex::Regex;

use crate::ingest::types::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagFormat {
    /// Original encoding: `whats-new-v2#year#2024`.
    Standard,
    /// Namespaced encoding observed after the schema migration:
    /// `GLOBAL#local-tags-whats-new-v2-year#2025`.
    Global,
}

impl TagFormat {
    /// Query order is part of the contract: Standard results are merged
    /// before Global ones so first-occurrence dedup stays deterministic.
    pub const ALL: [TagFormat; 2] = [TagFormat::Standard, TagFormat::Global];

    pub fn tag_id(self, year: i32) -> String {
        match self {
            TagFormat::Standard => format!("whats-new-v2#year#{year}"),
            TagFormat::Global => format!("GLOBAL#local-tags-whats-new-v2-year#{year}"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TagFormat::Standard => "standard",
            TagFormat::Global => "global",
        }
    }
}

/// Years a tag set claims an item belongs to, under any known encoding.
/// Both encodings end in `year#NNNN`, which is all the matcher relies on.
pub fn extract_year_tags(tags: &[Tag]) -> Vec<i32> {
    static RE_YEAR: OnceCell<Regex> = OnceCell::new();
    let re = RE_YEAR.get_or_init(|| Regex::new(r"year#(\d{4})$").unwrap());

    tags.iter()
        .filter_map(|t| re.captures(&t.id))
        .filter_map(|c| c[1].parse::<i32>().ok())
        .collect()
}
