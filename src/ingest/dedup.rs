// src/ingest/dedup.rs
use std::collections::HashSet;

use crate::ingest::types::RawItem;

/// Drop repeated source ids, keeping the first occurrence and its order.
/// Pure and O(n); repeats come from the per-format fan-out and from
/// overlapping pages.
pub fn dedup_by_source_id(items: Vec<RawItem>) -> Vec<RawItem> {
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|it| seen.insert(it.item.id.clone()))
        .collect()
}

/// Streaming form of the same rule: one `Deduper` lives for a whole
/// partition so the seen-set spans pages as well as tag formats.
#[derive(Debug, Default)]
pub struct Deduper {
    seen: HashSet<String>,
}

impl Deduper {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when this source id was already admitted.
    pub fn is_duplicate(&mut self, source_id: &str) -> bool {
        !self.seen.insert(source_id.to_string())
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::{AdditionalFields, ItemBody, RawItem};

    fn item(id: &str, headline: &str) -> RawItem {
        RawItem {
            item: ItemBody {
                id: id.to_string(),
                name: String::new(),
                author: None,
                date_created: None,
                date_updated: None,
                additional_fields: AdditionalFields {
                    headline: Some(headline.to_string()),
                    ..Default::default()
                },
            },
            tags: vec![],
        }
    }

    #[test]
    fn first_occurrence_wins() {
        let out = dedup_by_source_id(vec![
            item("a", "from standard"),
            item("b", "only once"),
            item("a", "from global"),
            item("a", "again"),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].item.id, "a");
        assert_eq!(
            out[0].item.additional_fields.headline.as_deref(),
            Some("from standard")
        );
        assert_eq!(out[1].item.id, "b");
    }

    #[test]
    fn deduper_spans_calls() {
        let mut d = Deduper::new();
        assert!(!d.is_duplicate("x"));
        assert!(d.is_duplicate("x"));
        assert!(!d.is_duplicate("y"));
        assert_eq!(d.seen_count(), 2);
    }
}
